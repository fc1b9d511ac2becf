//! Log line markup
//!
//! Logs carry inline colour tags that the presentation layer renders:
//! `<C>` names, `<R>` losses, `<G>` gains, `<Y>` highlights, closed by `</>`.

use crate::battle::state::WarUnitState;

pub fn name(unit: &WarUnitState) -> String {
    format!("<C>{}</>", unit.name)
}

pub fn loss(value: impl std::fmt::Display) -> String {
    format!("<R>{}</>", value)
}

pub fn gain(value: impl std::fmt::Display) -> String {
    format!("<G>{}</>", value)
}

pub fn highlight(value: impl std::fmt::Display) -> String {
    format!("<Y>{}</>", value)
}

pub fn percent(chance: f64) -> String {
    format!("{:.0}%", chance * 100.0)
}

/// Drop every colour tag, for plain-text sinks
pub fn strip(line: &str) -> String {
    let mut out = line.to_string();
    for tag in ["<C>", "<R>", "<G>", "<Y>", "</>"] {
        out = out.replace(tag, "");
    }
    out
}
