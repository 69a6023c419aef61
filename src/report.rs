//! Ratio report rendering
//!
//! Statistics are computed as structured values (`NodeStats`); rendering to
//! text, CSV, or JSON is a trivial boundary concern kept out of the engine.
//! The text layout follows the established reporting convention: one line per
//! node, `min, max, mean, stddev`, 6 fractional digits in scientific
//! notation.

use crate::errors::Result;
use crate::ratio::NodeStats;

/// Render the per-node report in the reference text layout
pub fn render_text(stats: &[NodeStats]) -> String {
    let mut out = String::new();
    out.push_str("On-node/total-node comms ratios:\n");
    out.push_str(" min, max, mean, stddev\n");
    out.push_str("--------------------------------\n");

    for row in stats {
        match &row.summary {
            Some(s) => out.push_str(&format!(
                "Node {}: {:.6e}, {:.6e}, {:.6e}, {:.6e}\n",
                row.node, s.min, s.max, s.mean, s.stddev
            )),
            None => out.push_str(&format!("Node {}: no recorded traffic\n", row.node)),
        }
    }

    out
}

/// Render the per-node report as CSV (empty stat fields for nodes with no
/// recorded traffic)
pub fn render_csv(stats: &[NodeStats]) -> String {
    let mut out = String::from("node,min,max,mean,stddev\n");

    for row in stats {
        match &row.summary {
            Some(s) => out.push_str(&format!(
                "{},{:.6e},{:.6e},{:.6e},{:.6e}\n",
                row.node, s.min, s.max, s.mean, s.stddev
            )),
            None => out.push_str(&format!("{},,,,\n", row.node)),
        }
    }

    out
}

/// Render the per-node report as pretty-printed JSON
pub fn render_json(stats: &[NodeStats]) -> Result<String> {
    let mut out = serde_json::to_string_pretty(stats)?;
    out.push('\n');
    Ok(out)
}
