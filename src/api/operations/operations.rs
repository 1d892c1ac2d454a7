//! Ordered, labeled collections of operations submitted as one mutate request

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use super::entity_ref::EntityRef;
use super::operation::Operation;

/// An operation paired with the label used when reporting its outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledOperation {
    pub label: String,
    pub operation: Operation,
}

impl LabeledOperation {
    pub fn new(label: impl Into<String>, operation: Operation) -> Self {
        Self {
            label: label.into(),
            operation,
        }
    }
}

/// A collection of operations that is submitted in a single request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operations {
    operations: Vec<LabeledOperation>,
}

impl Operations {
    /// Create a new empty operations collection
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    /// Add a labeled operation to the end of the collection
    pub fn add(mut self, label: impl Into<String>, operation: Operation) -> Self {
        self.operations.push(LabeledOperation::new(label, operation));
        self
    }

    pub fn push(&mut self, label: impl Into<String>, operation: Operation) {
        self.operations.push(LabeledOperation::new(label, operation));
    }

    /// Get the number of operations in this collection
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn operations(&self) -> &[LabeledOperation] {
        &self.operations
    }

    pub fn get(&self, index: usize) -> Option<&LabeledOperation> {
        self.operations.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledOperation> {
        self.operations.iter()
    }

    /// Split off the operation at `index` into its own collection
    pub fn take(&mut self, index: usize) -> Option<Operations> {
        if index >= self.operations.len() {
            return None;
        }
        let op = self.operations.remove(index);
        Some(Operations {
            operations: vec![op],
        })
    }

    /// Replace every reference to `from` with `to` in all operations
    pub fn rebind(self, from: EntityRef, to: EntityRef) -> Self {
        Self {
            operations: self
                .operations
                .into_iter()
                .map(|labeled| LabeledOperation {
                    label: labeled.label,
                    operation: labeled.operation.rebind(from, to),
                })
                .collect(),
        }
    }

    /// Render the `mutateOperations` array for the given customer
    pub fn to_mutate_operations(&self, customer_id: &str) -> Vec<Value> {
        self.operations
            .iter()
            .map(|labeled| labeled.operation.to_mutate_operation(customer_id))
            .collect()
    }

    /// Check that every provisional reference points at an entity created
    /// earlier in this same collection.
    ///
    /// `committed` holds tokens already used by earlier submissions; creating
    /// or referencing one of them here is rejected too.
    pub fn check_references(&self, committed: &HashSet<EntityRef>) -> Result<(), String> {
        let mut created: HashSet<EntityRef> = HashSet::new();

        for (index, labeled) in self.operations.iter().enumerate() {
            for reference in labeled.operation.references() {
                if !reference.is_provisional() {
                    continue;
                }
                if committed.contains(&reference) {
                    return Err(format!(
                        "operation {} ({}) references {} from an earlier submission; use its durable id",
                        index, labeled.label, reference
                    ));
                }
                if !created.contains(&reference) {
                    return Err(format!(
                        "operation {} ({}) references {} before it is created",
                        index, labeled.label, reference
                    ));
                }
            }

            if let Some(own) = labeled.operation.created_ref() {
                if !own.is_provisional() {
                    return Err(format!(
                        "operation {} ({}) creates an entity with durable id {}",
                        index, labeled.label, own
                    ));
                }
                if committed.contains(&own) || !created.insert(own) {
                    return Err(format!(
                        "operation {} ({}) reuses {}",
                        index, labeled.label, own
                    ));
                }
            }
        }

        Ok(())
    }

    /// Provisional tokens created by this collection
    pub fn created_tokens(&self) -> impl Iterator<Item = EntityRef> + '_ {
        self.operations
            .iter()
            .filter_map(|labeled| labeled.operation.created_ref())
            .filter(EntityRef::is_provisional)
    }
}

impl From<LabeledOperation> for Operations {
    fn from(operation: LabeledOperation) -> Self {
        Self {
            operations: vec![operation],
        }
    }
}

impl From<Vec<LabeledOperation>> for Operations {
    fn from(operations: Vec<LabeledOperation>) -> Self {
        Self { operations }
    }
}

impl IntoIterator for Operations {
    type Item = LabeledOperation;
    type IntoIter = std::vec::IntoIter<LabeledOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Operations {
    type Item = &'a LabeledOperation;
    type IntoIter = std::slice::Iter<'a, LabeledOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}
