use contracts::dashboards::d402_ticket_sales_target::{
    CategoryBreakdown, TicketKind, TicketKindBreakdown,
};

/// Keyword table that maps a ticket category to its kind.
///
/// Matching is a case-insensitive substring test. Speaker keywords are
/// checked before sponsor keywords; a category matching neither is `Paid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketKindRules {
    sponsor_keywords: Vec<String>,
    speaker_keywords: Vec<String>,
}

impl TicketKindRules {
    pub fn new(sponsor_keywords: Vec<String>, speaker_keywords: Vec<String>) -> Self {
        fn normalize(keywords: Vec<String>) -> Vec<String> {
            keywords
                .into_iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect()
        }

        Self {
            sponsor_keywords: normalize(sponsor_keywords),
            speaker_keywords: normalize(speaker_keywords),
        }
    }

    pub fn classify(&self, category: &str) -> TicketKind {
        let category = category.to_lowercase();
        let matches = |keywords: &[String]| keywords.iter().any(|k| category.contains(k.as_str()));

        if matches(self.speaker_keywords.as_slice()) {
            TicketKind::Speaker
        } else if matches(self.sponsor_keywords.as_slice()) {
            TicketKind::Sponsor
        } else {
            TicketKind::Paid
        }
    }

    /// Fold a per-category breakdown into per-kind totals
    pub fn breakdown(&self, categories: &CategoryBreakdown) -> TicketKindBreakdown {
        let mut result = TicketKindBreakdown::default();
        for (category, count) in categories {
            result.add(self.classify(category), *count);
        }
        result
    }
}

impl Default for TicketKindRules {
    fn default() -> Self {
        Self::new(vec!["sponsor".to_string()], vec!["speaker".to_string()])
    }
}
