/*!
 * Inline voice tag extraction.
 *
 * Recognizes a WebVTT voice span at the very start of a line:
 * `<v Speaker Name>What they said`. The scanner is anchored and does not
 * search further into the line for a later tag.
 */

const VOICE_CLOSE_TAG: &str = "</v>";

/// Split a `<v NAME>UTTERANCE` line into trimmed `(speaker, utterance)`.
///
/// Returns `None` when the line does not open with a well-formed voice tag.
pub fn extract(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix("<v")?;

    // Tag name must be exactly `v`, followed by whitespace
    let separator = rest.chars().next()?;
    if !separator.is_whitespace() {
        return None;
    }

    let close = rest.find('>')?;
    let name = &rest[..close];
    if name.contains('<') {
        return None;
    }

    let speaker = name.trim();
    if speaker.is_empty() {
        return None;
    }

    // Inline markup stays in the utterance; only the closing voice tag is dropped
    let utterance = rest[close + 1..].trim();
    let utterance = utterance.strip_suffix(VOICE_CLOSE_TAG).unwrap_or(utterance);

    Some((speaker.to_string(), utterance.trim().to_string()))
}
