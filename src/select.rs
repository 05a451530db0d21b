//! Choosing the release that matches the disc

use crate::musicbrainz::MbRelease;
use crate::prompt::Prompt;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum Selection<'a> {
    Release(&'a MbRelease),
    /// No candidates, or the user picked "None"
    None,
}

/// Let the user pick one of `releases`.
///
/// A single candidate is taken without asking. Otherwise the candidates
/// are listed with two-digit numbers followed by a "None" entry, and the
/// question repeats until a listed number is entered.
pub fn select_release<'a, P>(releases: &'a [MbRelease], prompt: &mut P) -> Selection<'a>
where
    P: Prompt + ?Sized,
{
    match releases {
        [] => return Selection::None,
        [only] => {
            prompt.say(&format!("\nRelease: {}", only.label()));
            return Selection::Release(only);
        }
        _ => {}
    }

    prompt.say("\nSelect release");
    for (index, release) in releases.iter().enumerate() {
        prompt.say(&format!("{:02}. {}", index + 1, release.label()));
    }
    let none_choice = releases.len() + 1;
    prompt.say(&format!("{:02}. None", none_choice));

    loop {
        let Some(answer) = prompt.ask(&format!("Choose 1-{}: ", none_choice)) else {
            debug!("Input closed during release selection");
            return Selection::None;
        };

        match parse_choice(&answer, none_choice) {
            Some(choice) if choice == none_choice => return Selection::None,
            Some(choice) => return Selection::Release(&releases[choice - 1]),
            None => debug!("Ignoring release choice {:?}", answer),
        }
    }
}

/// A 1-based choice within `1..=max`
fn parse_choice(answer: &str, max: usize) -> Option<usize> {
    answer
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|choice| (1..=max).contains(choice))
}
