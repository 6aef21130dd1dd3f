use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// Field name → value mapping of one sub-tree.
pub type FieldMap = Map<String, Value>;

/// One repeatable row of user data inside a category array.
pub type LineItemEntry = Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SubTree {
    FamilyData,
    Income,
    Assets,
    Liabilities,
    Expenses,
    AdditionalSections,
}

impl SubTree {
    pub const ALL: [SubTree; 6] = [
        SubTree::FamilyData,
        SubTree::Income,
        SubTree::Assets,
        SubTree::Liabilities,
        SubTree::Expenses,
        SubTree::AdditionalSections,
    ];

    pub fn json_key(self) -> &'static str {
        match self {
            SubTree::FamilyData => "familyData",
            SubTree::Income => "income",
            SubTree::Assets => "assets",
            SubTree::Liabilities => "liabilities",
            SubTree::Expenses => "expenses",
            SubTree::AdditionalSections => "additionalSections",
        }
    }
}

/// The canonical input: six named sub-trees as produced by the form
/// collector. Sub-trees are kept as raw JSON so that a wrongly shaped one
/// degrades to "empty" instead of failing deserialization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormDataTree {
    pub family_data: Value,
    pub income: Value,
    pub assets: Value,
    pub liabilities: Value,
    pub expenses: Value,
    pub additional_sections: Value,
}

impl FormDataTree {
    pub fn from_json_str(s: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_value(value: Value) -> Result<Self, Error> {
        Ok(serde_json::from_value(value)?)
    }

    fn raw(&self, which: SubTree) -> &Value {
        match which {
            SubTree::FamilyData => &self.family_data,
            SubTree::Income => &self.income,
            SubTree::Assets => &self.assets,
            SubTree::Liabilities => &self.liabilities,
            SubTree::Expenses => &self.expenses,
            SubTree::AdditionalSections => &self.additional_sections,
        }
    }

    fn raw_mut(&mut self, which: SubTree) -> &mut Value {
        match which {
            SubTree::FamilyData => &mut self.family_data,
            SubTree::Income => &mut self.income,
            SubTree::Assets => &mut self.assets,
            SubTree::Liabilities => &mut self.liabilities,
            SubTree::Expenses => &mut self.expenses,
            SubTree::AdditionalSections => &mut self.additional_sections,
        }
    }

    /// The sub-tree as a field map, or `None` when absent or not an object.
    pub fn subtree(&self, which: SubTree) -> Option<&FieldMap> {
        self.raw(which).as_object()
    }

    /// Sub-trees that are present but not objects. They are read as empty.
    pub fn malformed_subtrees(&self) -> Vec<SubTree> {
        SubTree::ALL
            .into_iter()
            .filter(|&s| {
                let v = self.raw(s);
                !v.is_null() && !v.is_object()
            })
            .collect()
    }

    /// Mutable access for form collectors; replaces a non-object sub-tree
    /// with an empty one.
    pub fn subtree_mut(&mut self, which: SubTree) -> &mut FieldMap {
        let slot = self.raw_mut(which);
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        match slot {
            Value::Object(map) => map,
            _ => unreachable!("sub-tree was just replaced by an object"),
        }
    }

    pub fn set_field(&mut self, which: SubTree, key: &str, value: impl Into<Value>) {
        self.subtree_mut(which).insert(key.to_string(), value.into());
    }

    /// Appends an entry to a category array, assigning a positional `id`
    /// when the entry has none.
    pub fn push_entry(&mut self, which: SubTree, key: &str, mut entry: LineItemEntry) {
        let slot = self
            .subtree_mut(which)
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        if let Value::Array(items) = slot {
            entry
                .entry("id".to_string())
                .or_insert_with(|| Value::from(items.len() as u64 + 1));
            items.push(Value::Object(entry));
        }
    }

    /// Removes the entry at `index`. Entries are only ever destroyed this way.
    pub fn remove_entry(&mut self, which: SubTree, key: &str, index: usize) -> Option<LineItemEntry> {
        let items = self.subtree_mut(which).get_mut(key)?.as_array_mut()?;
        if index >= items.len() {
            return None;
        }
        match items.remove(index) {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }
}
