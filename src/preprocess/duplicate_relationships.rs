// ==========================================
// Tracker 导入管道 - 重复关系预处理
// ==========================================
// 职责: 移除批次内重复的关系（保留首次出现）
// 判重: 关系类型相同，且
// - from/to 顺序一致；或
// - 关系类型为双向时 from/to 互换一致
// 关系类型无法解析的关系一律保留（交给校验报告）
// ==========================================

use crate::config::ValidationSettings;
use crate::domain::metadata::RelationshipType;
use crate::domain::tracker::{RelationshipItem, TrackerBundle};
use crate::preheat::TrackerPreheat;
use crate::preprocess::BundlePreProcessor;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Default)]
pub struct DuplicateRelationshipsPreProcessor;

type RelationshipKey = (String, RelationshipItem, RelationshipItem);

impl BundlePreProcessor for DuplicateRelationshipsPreProcessor {
    fn name(&self) -> &'static str {
        "DuplicateRelationshipsPreProcessor"
    }

    fn enabled(&self, settings: &ValidationSettings) -> bool {
        settings.preprocess_duplicate_relationships
    }

    fn process(&self, bundle: &mut TrackerBundle, preheat: &TrackerPreheat) -> usize {
        let mut first_occurrence: HashSet<RelationshipKey> = HashSet::new();
        let before = bundle.relationships.len();

        bundle.relationships.retain(|rel| {
            let Some(relationship_type) = rel
                .relationship_type_id()
                .and_then(|id| preheat.get::<RelationshipType>(id))
            else {
                return true;
            };

            let key = (
                relationship_type.uid.clone(),
                rel.from.clone(),
                rel.to.clone(),
            );
            let swapped = (
                relationship_type.uid.clone(),
                rel.to.clone(),
                rel.from.clone(),
            );

            let duplicate = first_occurrence.contains(&key)
                || (relationship_type.bidirectional && first_occurrence.contains(&swapped));
            if duplicate {
                debug!(
                    relationship = %rel.relationship,
                    relationship_type = %relationship_type.uid,
                    "移除重复关系"
                );
                return false;
            }

            first_occurrence.insert(key);
            true
        });

        before - bundle.relationships.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tracker::Relationship;
    use crate::validation::test_support;

    fn rel(uid: &str, rt: Option<&str>, from: &str, to: &str) -> Relationship {
        Relationship {
            relationship: uid.to_string(),
            relationship_type: rt.map(str::to_string),
            from: RelationshipItem::TrackedEntity(from.to_string()),
            to: RelationshipItem::TrackedEntity(to.to_string()),
            bidirectional: false,
        }
    }

    fn run(relationships: Vec<Relationship>) -> Vec<String> {
        let preheat = test_support::preheat();
        let mut bundle = TrackerBundle {
            relationships,
            ..Default::default()
        };
        DuplicateRelationshipsPreProcessor.process(&mut bundle, &preheat);
        bundle
            .relationships
            .into_iter()
            .map(|r| r.relationship)
            .collect()
    }

    #[test]
    fn test_identical_relationships_keep_first() {
        let kept = run(vec![
            rel("REL0000001a", Some("RT00000001a"), "TE00000001a", "TE00000002a"),
            rel("REL0000002a", Some("RT00000001a"), "TE00000001a", "TE00000002a"),
        ]);
        assert_eq!(kept, vec!["REL0000001a"]);
    }

    #[test]
    fn test_swapped_kept_when_unidirectional() {
        let kept = run(vec![
            rel("REL0000001a", Some("RT00000001a"), "TE00000001a", "TE00000002a"),
            rel("REL0000002a", Some("RT00000001a"), "TE00000002a", "TE00000001a"),
        ]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_swapped_removed_when_bidirectional() {
        // RT00000002a 为双向类型
        let kept = run(vec![
            rel("REL0000001a", Some("RT00000002a"), "TE00000001a", "TE00000002a"),
            rel("REL0000002a", Some("RT00000002a"), "TE00000002a", "TE00000001a"),
        ]);
        assert_eq!(kept, vec!["REL0000001a"]);
    }

    #[test]
    fn test_unresolved_type_never_deduplicated() {
        let kept = run(vec![
            rel("REL0000001a", None, "TE00000001a", "TE00000002a"),
            rel("REL0000002a", None, "TE00000001a", "TE00000002a"),
            rel("REL0000003a", Some("RT_NOPE001"), "TE00000001a", "TE00000002a"),
            rel("REL0000004a", Some("RT_NOPE001"), "TE00000001a", "TE00000002a"),
        ]);
        assert_eq!(kept.len(), 4);
    }

    #[test]
    fn test_different_types_not_duplicates() {
        let kept = run(vec![
            rel("REL0000001a", Some("RT00000001a"), "TE00000001a", "TE00000002a"),
            rel("REL0000002a", Some("RT00000002a"), "TE00000001a", "TE00000002a"),
        ]);
        assert_eq!(kept.len(), 2);
    }
}
