//! Terminal output formatting with colors.

use std::fmt::Display;

use colored::Colorize;

use anchors_core::AnchorCandidate;

/// The anchor as a single rule: `IF a AND b THEN predict label`.
///
/// `predicates[i]` describes predicate `i` of the instance, e.g. `age = 3`.
/// Indices without a description render as `x{i}`. An empty anchor renders
/// as an unconditional rule.
pub fn format_rule(
    anchor: &AnchorCandidate,
    predicates: &[String],
    prediction: impl Display,
) -> String {
    if anchor.is_empty() {
        return format!("IF (always) THEN predict {prediction}");
    }
    let conditions: Vec<String> = anchor
        .feature_mask
        .iter()
        .map(|&f| {
            predicates
                .get(f)
                .cloned()
                .unwrap_or_else(|| format!("x{f}"))
        })
        .collect();
    format!("IF {} THEN predict {prediction}", conditions.join(" AND "))
}

/// Format an anchor for human-readable terminal output.
///
/// Shows the rule followed by precision, coverage and the number of samples
/// behind the precision estimate.
pub fn format_anchor(
    anchor: &AnchorCandidate,
    predicates: &[String],
    prediction: impl Display,
) -> String {
    let mut out = String::new();
    let sep = "\u{2500}".repeat(62);

    out.push_str(&sep);
    out.push_str("\n\n");
    out.push_str(&format!("  {}\n\n", "Anchor".bold()));
    out.push_str(&format!("    {}\n\n", format_rule(anchor, predicates, prediction)));

    let precision = format!("{:.1}%", anchor.precision * 100.0);
    let precision = if anchor.precision >= 0.95 {
        precision.green()
    } else {
        precision.yellow()
    };
    out.push_str(&format!(
        "    Precision:    {} ({} / {} samples)\n",
        precision, anchor.positive_samples, anchor.n_samples
    ));
    out.push_str(&format!(
        "    Coverage:     {:.1}%\n",
        anchor.coverage * 100.0
    ));
    out.push_str(&format!("    Size:         {}\n", anchor.len()));

    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    out
}
