//! GPU stack version probes.
//!
//! Each probe walks an ordered list of detection strategies and returns
//! the first one that produces a version. Exhausting every strategy is an
//! answer, not an error: the report prints "Not found" for that library.

pub mod cuda;
pub mod driver;
pub mod nccl;

use regex::Regex;

/// Walk `strategies` in order and return the first hit.
///
/// Strategies after the first success are never invoked.
pub fn first_detected<T>(strategies: &[&dyn Fn() -> Option<T>]) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy())
}

/// Extract the dotted version number following `marker` in `text`.
///
/// The number must lead with a digit (`12`, `12.2`, `535.129.03`), so a
/// mangled line can never surface as a version string.
pub fn version_after(text: &str, marker: &str) -> Option<String> {
    let pattern = format!(r"{}\s+(\d+(?:\.\d+)*)", regex::escape(marker));
    let re = Regex::new(&pattern).ok()?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn first_detected_returns_first_hit() {
        let result = first_detected(&[&|| None::<u32>, &|| Some(7), &|| Some(9)]);
        assert_eq!(result, Some(7));
    }

    #[test]
    fn first_detected_stops_after_a_hit() {
        let later_calls = Cell::new(0u32);
        let result = first_detected(&[
            &|| Some("found".to_string()),
            &|| {
                later_calls.set(later_calls.get() + 1);
                Some("shadowed".to_string())
            },
        ]);
        assert_eq!(result.as_deref(), Some("found"));
        assert_eq!(later_calls.get(), 0);
    }

    #[test]
    fn first_detected_exhausts_to_none() {
        let result: Option<String> = first_detected(&[&|| None, &|| None]);
        assert_eq!(result, None);
    }

    #[test]
    fn version_after_extracts_dotted_number() {
        let text = "NVRM version: NVIDIA UNIX x86_64 Kernel Module  535.129.03  Wed Oct 25";
        assert_eq!(
            version_after(text, "Kernel Module").as_deref(),
            Some("535.129.03")
        );
    }

    #[test]
    fn version_after_stops_at_punctuation() {
        let text = "Cuda compilation tools, release 12.2, V12.2.140";
        assert_eq!(version_after(text, "release").as_deref(), Some("12.2"));
    }

    #[test]
    fn version_after_requires_the_marker() {
        assert_eq!(version_after("CUDA Version 12.2", "release"), None);
    }

    #[test]
    fn version_after_requires_a_leading_digit() {
        assert_eq!(version_after("Kernel Module  unknown", "Kernel Module"), None);
        assert_eq!(version_after("Kernel Module  .5", "Kernel Module"), None);
    }

    #[test]
    fn version_after_escapes_marker_metacharacters() {
        assert_eq!(
            version_after("lib (vendored) 1.2.3", "lib (vendored)").as_deref(),
            Some("1.2.3")
        );
    }
}
