use oxc_span::Span;
use rustc_hash::FxHashMap;

/// Ordering tag for a top-level statement. Higher priorities are placed
/// first; equal priorities keep their insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HoistPriority(pub u8);

impl HoistPriority {
    pub const ORDINARY: Self = Self(1);
    pub const EXPORT_PREDECLARATION: Self = Self(2);
    pub const MODULE_FLAG: Self = Self(3);
}

impl Default for HoistPriority {
    fn default() -> Self {
        Self::ORDINARY
    }
}

/// Caller-assigned priorities for top-level statements, keyed by the
/// statement's span.
pub type HoistHints = FxHashMap<Span, HoistPriority>;

pub fn priority_of(hints: &HoistHints, span: Span) -> HoistPriority {
    hints.get(&span).copied().unwrap_or_default()
}

/// Stable sort by descending priority.
pub fn arrange<T>(items: &mut [(HoistPriority, T)]) {
    items.sort_by(|(a, _), (b, _)| b.cmp(a));
}
