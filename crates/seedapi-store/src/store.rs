use seedapi_types::{Cardinality, Item, ItemId, ResourceData};

use crate::error::{StoreError, StoreResult};
use crate::page::Page;

/// Mutable in-memory data of one resource.
///
/// The variant is decided once from the resource's data and never changes.
/// Single-item operations on a collection (and vice versa) fail with
/// [`StoreError::CardinalityMismatch`].
#[derive(Clone, Debug, PartialEq)]
pub enum ResourceStore {
    Single(Item),
    Collection(Vec<Item>),
}

impl ResourceStore {
    /// Whether this store holds one item or a collection.
    pub fn cardinality(&self) -> Cardinality {
        match self {
            Self::Single(_) => Cardinality::Single,
            Self::Collection(_) => Cardinality::Collection,
        }
    }

    // ---- Single item ----

    /// The current item.
    pub fn read(&self) -> StoreResult<&Item> {
        match self {
            Self::Single(item) => Ok(item),
            Self::Collection(_) => Err(mismatch(Cardinality::Single, Cardinality::Collection)),
        }
    }

    /// Overwrite the item. The new item's fields are not checked.
    pub fn replace(&mut self, new_item: Item) -> StoreResult<()> {
        let item = self.single_mut()?;
        *item = new_item;
        Ok(())
    }

    /// Shallow-merge `partial` over the item.
    pub fn merge(&mut self, partial: Item) -> StoreResult<()> {
        let item = self.single_mut()?;
        shallow_merge(item, partial);
        Ok(())
    }

    // ---- Collection ----

    /// Items in the given pagination window, in stored order.
    pub fn list(&self, page: Page) -> StoreResult<&[Item]> {
        let items = self.items()?;
        Ok(&items[page.range(items.len())])
    }

    /// First item whose id matches `id`.
    pub fn find(&self, id: &ItemId) -> StoreResult<Option<&Item>> {
        Ok(self.items()?.iter().find(|item| id.matches(item)))
    }

    /// Append an item. Colliding ids are not rejected.
    pub fn insert(&mut self, item: Item) -> StoreResult<()> {
        self.items_mut()?.push(item);
        Ok(())
    }

    /// Replace the item with id `id` in place.
    ///
    /// Returns `Ok(false)` if no item matched.
    pub fn replace_by_id(&mut self, id: &ItemId, new_item: Item) -> StoreResult<bool> {
        let items = self.items_mut()?;
        match position(items, id) {
            Some(index) => {
                items[index] = new_item;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Shallow-merge `partial` into the item with id `id`.
    ///
    /// Returns `Ok(false)` if no item matched.
    pub fn merge_by_id(&mut self, id: &ItemId, partial: Item) -> StoreResult<bool> {
        let items = self.items_mut()?;
        match position(items, id) {
            Some(index) => {
                shallow_merge(&mut items[index], partial);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the item with id `id`; later items shift down by one.
    ///
    /// Returns `Ok(false)` if no item matched.
    pub fn remove_by_id(&mut self, id: &ItemId) -> StoreResult<bool> {
        let items = self.items_mut()?;
        match position(items, id) {
            Some(index) => {
                items.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Number of items held (1 for a single-item store).
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Collection(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn single_mut(&mut self) -> StoreResult<&mut Item> {
        match self {
            Self::Single(item) => Ok(item),
            Self::Collection(_) => Err(mismatch(Cardinality::Single, Cardinality::Collection)),
        }
    }

    fn items(&self) -> StoreResult<&Vec<Item>> {
        match self {
            Self::Collection(items) => Ok(items),
            Self::Single(_) => Err(mismatch(Cardinality::Collection, Cardinality::Single)),
        }
    }

    fn items_mut(&mut self) -> StoreResult<&mut Vec<Item>> {
        match self {
            Self::Collection(items) => Ok(items),
            Self::Single(_) => Err(mismatch(Cardinality::Collection, Cardinality::Single)),
        }
    }
}

impl From<ResourceData> for ResourceStore {
    fn from(data: ResourceData) -> Self {
        match data {
            ResourceData::Single(item) => Self::Single(item),
            ResourceData::Collection(items) => Self::Collection(items),
        }
    }
}

fn mismatch(expected: Cardinality, actual: Cardinality) -> StoreError {
    StoreError::CardinalityMismatch { expected, actual }
}

fn position(items: &[Item], id: &ItemId) -> Option<usize> {
    items.iter().position(|item| id.matches(item))
}

fn shallow_merge(target: &mut Item, partial: Item) {
    for (key, value) in partial {
        target.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn item(value: Value) -> Item {
        value.as_object().cloned().unwrap()
    }

    fn users(n: usize) -> ResourceStore {
        ResourceStore::Collection(
            (1..=n)
                .map(|i| item(json!({"id": i, "name": format!("user-{i}")})))
                .collect(),
        )
    }

    fn ids(items: &[Item]) -> Vec<Value> {
        items.iter().map(|i| i["id"].clone()).collect()
    }

    // -----------------------------------------------------------------------
    // Single item
    // -----------------------------------------------------------------------

    #[test]
    fn read_single() {
        let store = ResourceStore::Single(item(json!({"id": 1, "name": "Alice"})));
        assert_eq!(store.read().unwrap()["name"], "Alice");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn replace_overwrites_everything() {
        let mut store = ResourceStore::Single(item(json!({"id": 1, "name": "Alice"})));
        store.replace(item(json!({"nickname": "Al"}))).unwrap();
        assert_eq!(store.read().unwrap(), &item(json!({"nickname": "Al"})));
    }

    #[test]
    fn merge_after_replace_keeps_untouched_fields() {
        let mut store = ResourceStore::Single(Item::new());
        store.replace(item(json!({"id": 1, "name": "Alice", "age": 30}))).unwrap();
        store.merge(item(json!({"age": 31}))).unwrap();
        assert_eq!(
            store.read().unwrap(),
            &item(json!({"id": 1, "name": "Alice", "age": 31}))
        );
    }

    #[test]
    fn merge_is_shallow() {
        let mut store = ResourceStore::Single(item(json!({
            "address": {"city": "Oslo", "zip": "0150"}
        })));
        store.merge(item(json!({"address": {"city": "Bergen"}}))).unwrap();
        assert_eq!(store.read().unwrap()["address"], json!({"city": "Bergen"}));
    }

    #[test]
    fn single_ops_on_collection_fail() {
        let mut store = users(1);
        let expected = StoreError::CardinalityMismatch {
            expected: Cardinality::Single,
            actual: Cardinality::Collection,
        };
        assert_eq!(store.read().unwrap_err(), expected);
        assert_eq!(store.replace(Item::new()).unwrap_err(), expected);
        assert_eq!(store.merge(Item::new()).unwrap_err(), expected);
    }

    // -----------------------------------------------------------------------
    // Collection: list / pagination
    // -----------------------------------------------------------------------

    #[test]
    fn list_defaults_to_first_ten() {
        let store = users(25);
        let page = store.list(Page::default()).unwrap();
        assert_eq!(page.len(), 10);
        assert_eq!(page[0]["id"], 1);
        assert_eq!(page[9]["id"], 10);
    }

    #[test]
    fn list_eleven_users_five_per_page() {
        let store = users(11);
        let p1 = store.list(Page::new(Some(1), Some(5))).unwrap();
        let p2 = store.list(Page::new(Some(2), Some(5))).unwrap();
        let p3 = store.list(Page::new(Some(3), Some(5))).unwrap();
        let p4 = store.list(Page::new(Some(4), Some(5))).unwrap();
        assert_eq!(ids(p1), vec![json!(1), json!(2), json!(3), json!(4), json!(5)]);
        assert_eq!(ids(p2), vec![json!(6), json!(7), json!(8), json!(9), json!(10)]);
        assert_eq!(ids(p3), vec![json!(11)]);
        assert!(p4.is_empty());
    }

    #[test]
    fn list_empty_collection() {
        let store = ResourceStore::Collection(vec![]);
        assert!(store.list(Page::default()).unwrap().is_empty());
        assert!(store.is_empty());
    }

    // -----------------------------------------------------------------------
    // Collection: find / insert
    // -----------------------------------------------------------------------

    #[test]
    fn insert_then_find_numeric_id() {
        let mut store = users(2);
        store.insert(item(json!({"id": 12, "name": "Larry"}))).unwrap();
        let found = store.find(&ItemId::from("12")).unwrap().unwrap();
        assert_eq!(found["name"], "Larry");
    }

    #[test]
    fn insert_then_find_string_id() {
        let mut store = users(2);
        store.insert(item(json!({"id": "abc", "name": "Moe"}))).unwrap();
        let found = store.find(&ItemId::from("abc")).unwrap().unwrap();
        assert_eq!(found["name"], "Moe");
    }

    #[test]
    fn insert_appends_at_end() {
        let mut store = users(3);
        store.insert(item(json!({"id": 99}))).unwrap();
        let all = store.list(Page::default()).unwrap();
        assert_eq!(all.last().unwrap()["id"], 99);
    }

    #[test]
    fn duplicate_ids_are_accepted_and_first_wins() {
        let mut store = users(1);
        store.insert(item(json!({"id": 1, "name": "shadow"}))).unwrap();
        assert_eq!(store.len(), 2);
        let found = store.find(&ItemId::from("1")).unwrap().unwrap();
        assert_eq!(found["name"], "user-1");
    }

    #[test]
    fn find_missing() {
        let store = users(3);
        assert!(store.find(&ItemId::from("42")).unwrap().is_none());
    }

    // -----------------------------------------------------------------------
    // Collection: by-id mutations
    // -----------------------------------------------------------------------

    #[test]
    fn replace_by_id_keeps_position() {
        let mut store = users(3);
        assert!(store.replace_by_id(&ItemId::from("2"), item(json!({"id": 2, "x": true}))).unwrap());
        let all = store.list(Page::default()).unwrap();
        assert_eq!(all[1], item(json!({"id": 2, "x": true})));
        assert_eq!(ids(all), vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn merge_by_id_is_shallow_and_in_place() {
        let mut store = users(3);
        assert!(store.merge_by_id(&ItemId::from("3"), item(json!({"age": 7}))).unwrap());
        let merged = store.find(&ItemId::from("3")).unwrap().unwrap();
        assert_eq!(merged, &item(json!({"id": 3, "name": "user-3", "age": 7})));
    }

    #[test]
    fn remove_by_id_shifts_later_items() {
        let mut store = users(4);
        assert!(store.remove_by_id(&ItemId::from("2")).unwrap());
        let all = store.list(Page::default()).unwrap();
        assert_eq!(ids(all), vec![json!(1), json!(3), json!(4)]);
        assert!(store.find(&ItemId::from("2")).unwrap().is_none());
    }

    #[test]
    fn by_id_ops_on_missing_id_leave_store_unchanged() {
        let mut store = users(3);
        let before = store.clone();
        let missing = ItemId::from("404");
        assert!(!store.replace_by_id(&missing, Item::new()).unwrap());
        assert!(!store.merge_by_id(&missing, item(json!({"a": 1}))).unwrap());
        assert!(!store.remove_by_id(&missing).unwrap());
        assert_eq!(store, before);
    }

    #[test]
    fn collection_ops_on_single_fail() {
        let mut store = ResourceStore::Single(Item::new());
        let expected = StoreError::CardinalityMismatch {
            expected: Cardinality::Collection,
            actual: Cardinality::Single,
        };
        assert_eq!(store.list(Page::default()).unwrap_err(), expected);
        assert_eq!(store.find(&ItemId::from("1")).unwrap_err(), expected);
        assert_eq!(store.insert(Item::new()).unwrap_err(), expected);
        assert_eq!(store.remove_by_id(&ItemId::from("1")).unwrap_err(), expected);
    }

    #[test]
    fn from_resource_data() {
        let store = ResourceStore::from(ResourceData::Collection(vec![item(json!({"id": 1}))]));
        assert_eq!(store.cardinality(), Cardinality::Collection);
        let store = ResourceStore::from(ResourceData::Single(Item::new()));
        assert_eq!(store.cardinality(), Cardinality::Single);
    }

    proptest! {
        #[test]
        fn removed_id_never_listed(n in 1usize..40, pick in 0usize..40) {
            let mut store = users(n);
            let target = (pick % n) + 1;
            let id = ItemId::new(target.to_string());
            prop_assert!(store.remove_by_id(&id).unwrap());
            let all = store.list(Page::new(Some(1), Some(n))).unwrap();
            prop_assert_eq!(all.len(), n - 1);
            prop_assert!(all.iter().all(|i| !id.matches(i)));
        }

        #[test]
        fn list_is_slice_of_items(n in 0usize..60, page in 1usize..10, per_page in 1usize..15) {
            let store = users(n);
            let listed = store.list(Page::new(Some(page), Some(per_page))).unwrap();
            let start = ((page - 1) * per_page).min(n);
            let end = (page * per_page).min(n);
            let expected: Vec<Value> = (start..end).map(|i| json!(i + 1)).collect();
            prop_assert_eq!(ids(listed), expected);
        }
    }
}
