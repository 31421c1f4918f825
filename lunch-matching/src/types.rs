use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Someone who asked to be matched for lunch on a given day.
///
/// Only `id` and `department` are used for grouping; `name` is carried along
/// for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Person {
    pub fn new(id: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            department: Some(department.into()),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }
}

/// One lunch table. Serializes as a plain array of people.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group {
    members: Vec<Person>,
}

impl Group {
    pub fn new(members: Vec<Person>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[Person] {
        &self.members
    }

    pub fn into_members(self) -> Vec<Person> {
        self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn push(&mut self, person: Person) {
        self.members.push(person);
    }

    /// Distinct department labels at this table; an absent label counts as
    /// its own department.
    pub fn departments(&self) -> HashSet<Option<&str>> {
        self.members.iter().map(Person::department).collect()
    }
}

impl From<Vec<Person>> for Group {
    fn from(members: Vec<Person>) -> Self {
        Self::new(members)
    }
}

/// Bounds on how many people sit at one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSizeConfig {
    min_size: usize,
    max_size: usize,
}

impl GroupSizeConfig {
    pub const DEFAULT_MIN_SIZE: usize = 3;
    pub const DEFAULT_MAX_SIZE: usize = 4;

    pub fn new(min_size: usize, max_size: usize) -> Result<Self> {
        if min_size == 0 || min_size > max_size {
            return Err(Error::InvalidGroupSize {
                min: min_size,
                max: max_size,
            });
        }
        Ok(Self { min_size, max_size })
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for GroupSizeConfig {
    fn default() -> Self {
        Self {
            min_size: Self::DEFAULT_MIN_SIZE,
            max_size: Self::DEFAULT_MAX_SIZE,
        }
    }
}
