mod support;

use isrc_submit::app::{choose_and_submit, AppError};
use isrc_submit::cd::collect_isrcs;
use isrc_submit::prompt::ScriptedPrompt;
use isrc_submit::submission::SubmitError;
use support::{disc, release, MockMusicBrainz, DISC_ID};

fn isrcs_for_tracks_1_2_5() -> isrc_submit::cd::TrackIsrcs {
    collect_isrcs([
        "T:   1 ISRC: US-S1Z-99-00001",
        "T:   2 ISRC: US-S1Z-99-00002",
        "T:   5 ISRC: US-S1Z-99-00005",
    ])
}

#[tokio::test]
async fn test_single_release_submits_detected_tracks_only() {
    support::tracing_init();

    let candidate = release("Ten Tracks", 10);
    let service = MockMusicBrainz::new(vec![candidate.clone()]);
    let mut prompt = ScriptedPrompt::new(Vec::<String>::new());

    let submitted = choose_and_submit(&service, &disc(), &isrcs_for_tracks_1_2_5(), &mut prompt)
        .await
        .unwrap();

    assert_eq!(submitted, 3);
    assert!(prompt.questions.is_empty(), "single release must not prompt");
    assert_eq!(service.lookups.lock().unwrap().as_slice(), [DISC_ID]);

    let submissions = service.submitted();
    assert_eq!(submissions.len(), 1);
    let mapping = &submissions[0];
    let positions: Vec<usize> = mapping.iter().map(|entry| entry.position).collect();
    assert_eq!(positions, vec![1, 2, 5]);
    assert_eq!(mapping[0].recording_id, candidate.tracks[0].recording_id);
    assert_eq!(mapping[1].recording_id, candidate.tracks[1].recording_id);
    assert_eq!(mapping[2].recording_id, candidate.tracks[4].recording_id);
    assert_eq!(mapping[2].isrc.as_str(), "USS1Z9900005");

    let transcript = prompt.transcript();
    assert!(transcript.contains("Submitting ISRCs for 3 tracks to MusicBrainz... "));
    assert!(transcript.ends_with("done."));
}

#[tokio::test]
async fn test_invalid_choices_reprompt_until_valid() {
    let candidates = vec![release("First", 4), release("Second", 4), release("Third", 4)];
    let chosen = candidates[1].clone();
    let service = MockMusicBrainz::new(candidates);
    let mut prompt = ScriptedPrompt::new(["0", "7", "2"]);

    choose_and_submit(&service, &disc(), &isrcs_for_tracks_1_2_5(), &mut prompt)
        .await
        .unwrap();

    assert_eq!(prompt.questions.len(), 3);
    let submissions = service.submitted();
    assert_eq!(submissions[0].len(), 2);
    assert_eq!(submissions[0][0].recording_id, chosen.tracks[0].recording_id);
}

#[tokio::test]
async fn test_no_release_prints_submission_url() {
    let service = MockMusicBrainz::new(Vec::new());
    let mut prompt = ScriptedPrompt::new(["1"]);

    let err = choose_and_submit(&service, &disc(), &isrcs_for_tracks_1_2_5(), &mut prompt)
        .await
        .unwrap_err();

    match &err {
        AppError::NoRelease { submission_url } => {
            assert_eq!(submission_url, &disc().submission_url)
        }
        other => panic!("Expected NoRelease, got {:?}", other),
    }
    assert!(err.to_string().contains(&disc().submission_url));
    assert_eq!(err.exit_code(), 1);
    assert!(service.submitted().is_empty());
    assert!(prompt.questions.is_empty());
}

#[tokio::test]
async fn test_declining_all_releases() {
    let service = MockMusicBrainz::new(vec![release("First", 4), release("Second", 4)]);
    let mut prompt = ScriptedPrompt::new(["3"]);

    let err = choose_and_submit(&service, &disc(), &isrcs_for_tracks_1_2_5(), &mut prompt)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NoRelease { .. }));
    assert!(service.submitted().is_empty());
}

#[tokio::test]
async fn test_wrong_credentials() {
    let service = MockMusicBrainz::new(vec![release("Only", 10)]).rejecting_credentials();
    let mut prompt = ScriptedPrompt::new(Vec::<String>::new());

    let err = choose_and_submit(&service, &disc(), &isrcs_for_tracks_1_2_5(), &mut prompt)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Submit(SubmitError::Authentication)));
    assert_eq!(err.to_string(), "Wrong username or password.");
    assert!(prompt.transcript().ends_with("failed."));
}

#[tokio::test]
async fn test_release_without_matching_positions() {
    // Only track 5 on disc has an ISRC, but the release lists four tracks
    let service = MockMusicBrainz::new(vec![release("Short", 4)]);
    let isrcs = collect_isrcs(["T: 5 ISRC: USS1Z9900005"]);
    let mut prompt = ScriptedPrompt::new(Vec::<String>::new());

    let err = choose_and_submit(&service, &disc(), &isrcs, &mut prompt)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Submit(SubmitError::NothingToSubmit(4))
    ));
    assert!(service.submitted().is_empty());
}
