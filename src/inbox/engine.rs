use crate::api::models::{Collections, Record};

/// Category constraint for the combined inbox. Bounded by construction, so
/// there is no "unknown filter" case anywhere downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Users,
    Conversations,
    Calls,
}

impl Filter {
    /// Section title used when this filter selects a single category.
    pub fn title(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Users => "Users",
            Filter::Conversations => "Conversations",
            Filter::Calls => "Calls",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: &'static str,
    pub records: Vec<Record>,
}

fn matches(name: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || name.to_lowercase().contains(needle_lower)
}

/// Derive the visible, sectioned inbox from the three collections, the
/// active category filter, and the free-text search.
///
/// Search is a trimmed, case-insensitive substring match on the record
/// name; whitespace-only input behaves like no search at all. With
/// `Filter::All` the result is partitioned into "Users" / "Recent Chats" /
/// "Recent Calls" in that order, and a section whose partition is empty is
/// omitted entirely. A single-category filter always yields exactly one
/// section, even when it has no records. Within a section the original
/// collection order is preserved; no recency sort is applied because the
/// fixture data carries only display labels, not real timestamps.
pub fn compute_sections(collections: &Collections, filter: Filter, query: &str) -> Vec<Section> {
    let needle = query.trim().to_lowercase();

    let users = || {
        collections
            .users
            .iter()
            .filter(|u| matches(&u.name, &needle))
            .cloned()
            .map(Record::User)
            .collect::<Vec<_>>()
    };
    let conversations = || {
        collections
            .conversations
            .iter()
            .filter(|c| matches(&c.name, &needle))
            .cloned()
            .map(Record::Conversation)
            .collect::<Vec<_>>()
    };
    let calls = || {
        collections
            .calls
            .iter()
            .filter(|c| matches(&c.name, &needle))
            .cloned()
            .map(Record::Call)
            .collect::<Vec<_>>()
    };

    match filter {
        Filter::All => {
            let mut sections = Vec::with_capacity(3);
            let (users, conversations, calls) = (users(), conversations(), calls());
            if !users.is_empty() {
                sections.push(Section { title: "Users", records: users });
            }
            if !conversations.is_empty() {
                sections.push(Section { title: "Recent Chats", records: conversations });
            }
            if !calls.is_empty() {
                sections.push(Section { title: "Recent Calls", records: calls });
            }
            sections
        }
        Filter::Users => vec![Section { title: filter.title(), records: users() }],
        Filter::Conversations => vec![Section { title: filter.title(), records: conversations() }],
        Filter::Calls => vec![Section { title: filter.title(), records: calls() }],
    }
}
