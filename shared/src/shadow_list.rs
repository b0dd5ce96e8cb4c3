use crate::dataset::{EntryIndex, RecognitionKind};
use crate::legend::LegendState;

/// One focusable control in the visually hidden keyboard list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowListItem {
    pub iso: String,
    pub name: String,
    pub recognition: RecognitionKind,
}

impl ShadowListItem {
    pub fn label(&self) -> String {
        format!("{} \u{2014} {}", self.name, self.recognition.list_label())
    }

    pub fn is_disabled(&self, legend: &LegendState) -> bool {
        !legend.is_active(self.recognition)
    }
}

/// Every entry, ordered by display name.
pub fn shadow_list(entries: &EntryIndex) -> Vec<ShadowListItem> {
    let mut items: Vec<ShadowListItem> = entries
        .iter()
        .map(|e| ShadowListItem {
            iso: e.iso_code.clone(),
            name: e.name.clone(),
            recognition: e.recognition,
        })
        .collect();
    items.sort_by_cached_key(|item| (item.name.to_lowercase(), item.iso.clone()));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::bundle;

    #[test]
    fn sorted_by_name_with_kind_labels() {
        let items = shadow_list(&bundle().entries);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Brazil", "Guatemala", "Paraguay", "United States"]);
        assert_eq!(items[2].label(), "Paraguay \u{2014} Recognizes Taiwan");
        assert_eq!(items[0].label(), "Brazil \u{2014} Recognizes the PRC (Beijing)");
    }

    #[test]
    fn disabled_when_kind_hidden() {
        let items = shadow_list(&bundle().entries);
        let mut legend = LegendState::default();
        assert!(items.iter().all(|i| !i.is_disabled(&legend)));
        legend.toggle(RecognitionKind::Taiwan);
        let disabled: Vec<&str> = items
            .iter()
            .filter(|i| i.is_disabled(&legend))
            .map(|i| i.iso.as_str())
            .collect();
        assert_eq!(disabled, ["GTM", "PRY"]);
    }
}
