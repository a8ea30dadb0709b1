use counter_delegation_sdk::instruction::{TreeInfo, TreeType};
use tracing::{debug, warn};

use super::DelegationError;
use crate::{
    config::{AddressTreePolicy, OutputTreePolicy},
    indexer::Indexer,
};

/// Resolves the address tree the delegation record address is derived in.
pub async fn resolve_address_tree<I: Indexer + ?Sized>(
    indexer: &I,
    policy: &AddressTreePolicy,
) -> Result<TreeInfo, DelegationError> {
    match policy {
        AddressTreePolicy::Fixed(tree_info) => Ok(*tree_info),
        AddressTreePolicy::Indexer { fallback } => {
            match indexer.get_address_tree_info(None).await? {
                Some(tree_info) => {
                    debug!("Using address tree {} from indexer", tree_info.tree);
                    Ok(tree_info)
                }
                None => {
                    warn!(
                        "Indexer reported no address tree, falling back to {}",
                        fallback.tree
                    );
                    Ok(*fallback)
                }
            }
        }
    }
}

/// Picks the last v2 state tree of `trees`, after appending `batched_override`
/// if it is missing.
pub fn select_output_state_tree(
    mut trees: Vec<TreeInfo>,
    batched_override: Option<TreeInfo>,
) -> Option<TreeInfo> {
    if let Some(batched) = batched_override {
        if !trees.iter().any(|tree| tree.tree == batched.tree) {
            trees.push(batched);
        }
    }
    trees
        .into_iter()
        .rev()
        .find(|tree| tree.tree_type == TreeType::StateV2)
}

/// Output state tree for [`OutputTreePolicy::StateTrees`]. Returns `None`
/// for [`OutputTreePolicy::AddressTreeQueue`], the caller packs the queue
/// it already holds.
pub async fn resolve_output_tree<I: Indexer + ?Sized>(
    indexer: &I,
    policy: &OutputTreePolicy,
) -> Result<Option<TreeInfo>, DelegationError> {
    match policy {
        OutputTreePolicy::AddressTreeQueue => Ok(None),
        OutputTreePolicy::StateTrees { batched_override } => {
            let trees = indexer.get_state_tree_infos(None).await?;
            select_output_state_tree(trees, *batched_override)
                .map(Some)
                .ok_or(DelegationError::NoStateTree)
        }
    }
}

#[cfg(test)]
mod test {
    use counter_delegation_sdk::Pubkey;

    use super::*;

    fn tree(tree_type: TreeType) -> TreeInfo {
        TreeInfo {
            tree: Pubkey::new_unique(),
            queue: Pubkey::new_unique(),
            tree_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_select_output_state_tree() {
        let v1 = tree(TreeType::StateV1);
        let v2_a = tree(TreeType::StateV2);
        let v2_b = tree(TreeType::StateV2);

        assert_eq!(
            select_output_state_tree(vec![v2_a, v1, v2_b, v1], None),
            Some(v2_b)
        );
        assert_eq!(select_output_state_tree(vec![v1], None), None);

        let batched = tree(TreeType::StateV2);
        assert_eq!(
            select_output_state_tree(vec![v1, v2_a], Some(batched)),
            Some(batched)
        );
        // Already known, not appended again.
        assert_eq!(
            select_output_state_tree(vec![batched, v2_a], Some(batched)),
            Some(v2_a)
        );
    }
}
