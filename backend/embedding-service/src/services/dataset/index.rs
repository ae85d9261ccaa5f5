use crate::models::{Interaction, ItemId, Record, UserId};
use crate::utils::{mean, median, round2, variance};
use indexmap::IndexMap;
use tracing::info;

/// Per-user interaction history
///
/// Users iterate in first-seen order; each user's interactions keep input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserHistory {
    users: IndexMap<UserId, Vec<Interaction>>,
}

impl UserHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, user_id: UserId, interaction: Interaction) {
        self.users.entry(user_id).or_default().push(interaction);
    }

    /// Set a user's full interaction list, keeping the user's original position
    pub fn insert(&mut self, user_id: UserId, interactions: Vec<Interaction>) {
        self.users.insert(user_id, interactions);
    }

    pub fn get(&self, user_id: UserId) -> Option<&[Interaction]> {
        self.users.get(&user_id).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (UserId, &[Interaction])> {
        self.users.iter().map(|(&user, items)| (user, items.as_slice()))
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn interaction_count(&self) -> usize {
        self.users.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Flatten back into records: users in first-seen order, history order within each user
    pub fn to_records(&self) -> Vec<Record> {
        self.iter()
            .flat_map(|(user, items)| {
                items
                    .iter()
                    .map(move |i| Record::new(user, i.item_id, i.label))
            })
            .collect()
    }
}

/// item_id → users that rated it, in first-seen append order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemIndex {
    items: IndexMap<ItemId, Vec<UserId>>,
}

impl ItemIndex {
    pub fn users_of(&self, item_id: ItemId) -> Option<&[UserId]> {
        self.items.get(&item_id).map(Vec::as_slice)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.keys().copied()
    }
}

/// Label summary reported when a dataset is loaded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub variance: f64,
    pub unique_users: usize,
    pub unique_items: usize,
}

impl DatasetStats {
    pub fn log(&self, source: &str) {
        info!(
            "In {} there are {} ratings: mean={}, median={}, variance={}",
            source,
            self.count,
            round2(self.mean),
            round2(self.median),
            round2(self.variance)
        );
        info!(
            "There are {} unique users and {} unique items",
            self.unique_users, self.unique_items
        );
    }
}

/// Both groupings of a record sequence, built in one pass
#[derive(Debug, Clone, Default)]
pub struct InteractionIndex {
    users: UserHistory,
    items: ItemIndex,
    labels: Vec<f32>,
}

impl InteractionIndex {
    /// Repeated (user, item) pairs are kept as repeated entries.
    pub fn build(records: &[Record]) -> Self {
        let mut index = Self::default();

        for record in records {
            index.users.push(record.user_id, record.interaction());
            index
                .items
                .items
                .entry(record.item_id)
                .or_default()
                .push(record.user_id);
            index.labels.push(record.label);
        }

        index
    }

    pub fn users(&self) -> &UserHistory {
        &self.users
    }

    pub fn items(&self) -> &ItemIndex {
        &self.items
    }

    pub fn into_user_history(self) -> UserHistory {
        self.users
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            count: self.labels.len(),
            mean: mean(&self.labels),
            median: median(&self.labels),
            variance: variance(&self.labels),
            unique_users: self.users.user_count(),
            unique_items: self.items.item_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Record> {
        vec![
            Record::new(2, 10, 4.0),
            Record::new(1, 11, 3.0),
            Record::new(2, 12, 5.0),
            Record::new(1, 10, 1.0),
            Record::new(2, 10, 2.0),
        ]
    }

    #[test]
    fn test_user_history_preserves_order() {
        let index = InteractionIndex::build(&sample());
        let users: Vec<UserId> = index.users().iter().map(|(u, _)| u).collect();
        assert_eq!(users, vec![2, 1]);

        let items: Vec<ItemId> = index
            .users()
            .get(2)
            .unwrap()
            .iter()
            .map(|i| i.item_id)
            .collect();
        // duplicate (2, 10) is kept
        assert_eq!(items, vec![10, 12, 10]);
    }

    #[test]
    fn test_item_index_append_order() {
        let index = InteractionIndex::build(&sample());
        assert_eq!(index.items().users_of(10), Some(&[2, 1, 2][..]));
        assert_eq!(index.items().users_of(11), Some(&[1][..]));
        assert_eq!(index.items().users_of(99), None);
        assert_eq!(index.items().item_ids().collect::<Vec<_>>(), vec![10, 11, 12]);
    }

    #[test]
    fn test_stats() {
        let stats = InteractionIndex::build(&sample()).stats();
        assert_eq!(stats.count, 5);
        assert!((stats.mean - 3.0).abs() < 1e-9);
        assert!((stats.median - 3.0).abs() < 1e-9);
        assert!((stats.variance - 2.0).abs() < 1e-9);
        assert_eq!(stats.unique_users, 2);
        assert_eq!(stats.unique_items, 3);
    }

    #[test]
    fn test_to_records_groups_by_user() {
        let records = InteractionIndex::build(&sample()).users().to_records();
        assert_eq!(
            records,
            vec![
                Record::new(2, 10, 4.0),
                Record::new(2, 12, 5.0),
                Record::new(2, 10, 2.0),
                Record::new(1, 11, 3.0),
                Record::new(1, 10, 1.0),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let index = InteractionIndex::build(&[]);
        assert!(index.users().is_empty());
        assert_eq!(index.stats(), DatasetStats::default());
    }
}
