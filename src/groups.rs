use crate::api::models::GroupRecord;

/// Outcome of tapping a group. Joined groups would open their chat,
/// unjoined ones prompt to join first; neither flow is implemented in the
/// core, so the caller presents both as it sees fit.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupSelection {
    OpenChat { name: String },
    Join { name: String, description: String },
}

/// The group directory screen's state: the list plus the same trimmed,
/// case-insensitive name search the inbox uses.
pub struct GroupsDirectory {
    groups: Vec<GroupRecord>,
    search_query: String,
}

impl GroupsDirectory {
    pub fn new(groups: Vec<GroupRecord>) -> Self {
        Self {
            groups,
            search_query: String::new(),
        }
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn visible(&self) -> Vec<&GroupRecord> {
        let needle = self.search_query.trim().to_lowercase();
        self.groups
            .iter()
            .filter(|g| needle.is_empty() || g.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn select(&self, group: &GroupRecord) -> GroupSelection {
        if group.has_joined {
            GroupSelection::OpenChat {
                name: group.name.clone(),
            }
        } else {
            GroupSelection::Join {
                name: group.name.clone(),
                description: group.description.clone(),
            }
        }
    }
}
