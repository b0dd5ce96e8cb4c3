use tracing::debug;

use crate::dataset::RecognitionKind;

/// Which recognition kinds are shown at full strength. At least one kind is
/// always active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendState {
    china: bool,
    taiwan: bool,
}

impl Default for LegendState {
    fn default() -> Self {
        Self {
            china: true,
            taiwan: true,
        }
    }
}

impl LegendState {
    pub fn is_active(&self, kind: RecognitionKind) -> bool {
        match kind {
            RecognitionKind::China => self.china,
            RecognitionKind::Taiwan => self.taiwan,
        }
    }

    /// Countries without an entry are never dimmed.
    pub fn is_visible(&self, kind: Option<RecognitionKind>) -> bool {
        kind.is_none_or(|k| self.is_active(k))
    }

    fn slot(&mut self, kind: RecognitionKind) -> &mut bool {
        match kind {
            RecognitionKind::China => &mut self.china,
            RecognitionKind::Taiwan => &mut self.taiwan,
        }
    }

    /// Flip `kind`. Switching off the last active kind is refused and
    /// returns `false`.
    pub fn toggle(&mut self, kind: RecognitionKind) -> bool {
        let next = !self.is_active(kind);
        *self.slot(kind) = next;
        if !self.china && !self.taiwan {
            *self.slot(kind) = true;
            debug!(?kind, "refusing to hide the last visible recognition kind");
            return false;
        }
        true
    }

    pub fn active_kinds(&self) -> impl Iterator<Item = RecognitionKind> + '_ {
        RecognitionKind::ALL.into_iter().filter(|&k| self.is_active(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RecognitionKind::{China, Taiwan};

    #[test]
    fn starts_with_both_active() {
        let legend = LegendState::default();
        assert!(legend.is_active(China) && legend.is_active(Taiwan));
        assert!(legend.is_visible(None));
    }

    #[test]
    fn double_toggle_restores() {
        let mut legend = LegendState::default();
        assert!(legend.toggle(China));
        assert!(!legend.is_active(China));
        assert!(legend.toggle(China));
        assert_eq!(legend, LegendState::default());
    }

    #[test]
    fn never_hides_both_kinds() {
        let sequences = [
            vec![China, Taiwan],
            vec![Taiwan, China],
            vec![China, China, Taiwan, China],
            vec![Taiwan, Taiwan, Taiwan, China, Taiwan],
        ];
        for seq in sequences {
            let mut legend = LegendState::default();
            for kind in seq {
                legend.toggle(kind);
                assert!(legend.active_kinds().count() >= 1);
            }
        }
    }

    #[test]
    fn exhaustive_short_sequences_keep_one_kind() {
        for len in 0..=6u32 {
            for bits in 0..(1u32 << len) {
                let mut legend = LegendState::default();
                for i in 0..len {
                    legend.toggle(if bits & (1 << i) == 0 { China } else { Taiwan });
                    assert!(legend.active_kinds().count() >= 1);
                }
            }
        }
    }

    #[test]
    fn refused_toggle_leaves_state_unchanged() {
        let mut legend = LegendState::default();
        legend.toggle(China);
        let before = legend;
        assert!(!legend.toggle(Taiwan));
        assert_eq!(legend, before);
        assert!(legend.is_visible(Some(Taiwan)));
        assert!(!legend.is_visible(Some(China)));
    }
}
