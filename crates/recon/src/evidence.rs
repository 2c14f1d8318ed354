use crate::model::{FruitRecord, GamepassRecord, ReconReport, ReconSummary};

/// Compute summary statistics from the finalized output and its report.
pub fn compute_summary(
    fruits: &[FruitRecord],
    gamepasses: &[GamepassRecord],
    report: &ReconReport,
) -> ReconSummary {
    ReconSummary {
        fruits: fruits.len(),
        skins: fruits.iter().map(|f| f.skins.len()).sum(),
        gamepasses: gamepasses.len(),
        mismatches: report.mismatches.len(),
        unresolved: report.unresolved.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MismatchKind, SkinMismatch, SkinRecord};

    fn fruit(name: &str, skins: usize) -> FruitRecord {
        FruitRecord {
            name: name.into(),
            skins: (0..skins)
                .map(|i| SkinRecord {
                    name: format!("Skin {i}"),
                    ..SkinRecord::default()
                })
                .collect(),
            ..FruitRecord::default()
        }
    }

    #[test]
    fn summary_counts() {
        let fruits = vec![fruit("Flame", 2), fruit("Ice", 0), fruit("Dough", 3)];
        let gamepasses = vec![GamepassRecord::default()];
        let report = ReconReport {
            mismatches: vec![SkinMismatch {
                fruit: "Ice".into(),
                kind: MismatchKind::Presence,
                only_in_listings: vec![],
                only_in_info: vec!["Frost".into()],
            }],
            unresolved: vec!["Mystery Box".into(), "Odd One".into()],
        };
        let summary = compute_summary(&fruits, &gamepasses, &report);
        assert_eq!(summary.fruits, 3);
        assert_eq!(summary.skins, 5);
        assert_eq!(summary.gamepasses, 1);
        assert_eq!(summary.mismatches, 1);
        assert_eq!(summary.unresolved, 2);
    }

    #[test]
    fn empty_run() {
        let summary = compute_summary(&[], &[], &ReconReport::default());
        assert_eq!(summary, ReconSummary::default());
    }
}
