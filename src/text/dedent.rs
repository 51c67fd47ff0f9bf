/// Removes the indentation shared by every non-blank line.
///
/// Leading blank lines and trailing whitespace are trimmed from the result.
/// If every line is blank the input is returned as is.
pub fn dedent(text: &str) -> String {
    let Some(indent) = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
    else {
        return text.to_string();
    };

    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.get(indent..).unwrap_or(line))
        .collect();

    let start = lines
        .iter()
        .position(|line| !line.trim().is_empty())
        .unwrap_or(0);

    lines[start..].join("\n").trim_end().to_string()
}
