//! Contact Entity
//!
//! People that tasks can be assigned to. `assignedUsers` on a task holds
//! contact ids.

use serde::{Deserialize, Deserializer, Serialize};

use super::record_id::RecordId;

/// Avatar background colors, picked by contact number
pub const AVATAR_PALETTE: [&str; 15] = [
    "#FF7A00", "#FF5EB3", "#6E52FF", "#9327FF", "#00BEE8",
    "#1FD7C1", "#FF745E", "#FFA35E", "#FC71FF", "#FFC701",
    "#0038FF", "#C3FF2B", "#FFE62B", "#FF4646", "#FFBB2B",
];

/// Uploaded avatar; `data` is the encoded image as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AvatarImage {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub initials: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_image: Option<AvatarImage>,
    /// Legacy field, not read by the sync path
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "one_or_many")]
    pub assigned_to: Vec<String>,
}

impl Contact {
    /// Letter used to group the contact list
    pub fn group_letter(&self) -> char {
        self.name
            .trim()
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('#')
    }
}

/// Validated output of the contact form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub avatar_image: Option<AvatarImage>,
}

impl ContactDraft {
    pub fn into_contact(self, id: &RecordId) -> Contact {
        let initials = initials_of(&self.name);
        let color = if self.avatar_image.is_some() {
            None
        } else {
            Some(palette_color(id).to_string())
        };
        Contact {
            id: id.to_string(),
            name: self.name,
            email: self.email,
            phone: self.phone,
            initials,
            avatar_color: color,
            avatar_image: self.avatar_image,
            assigned_to: Vec::new(),
        }
    }

    /// Overwrite the editable fields; a contact keeps its color unless an
    /// image replaces it
    pub fn apply_to(self, contact: &mut Contact) {
        contact.initials = initials_of(&self.name);
        contact.name = self.name;
        contact.email = self.email;
        contact.phone = self.phone;
        if self.avatar_image.is_some() {
            contact.avatar_image = self.avatar_image;
            contact.avatar_color = None;
        } else if contact.avatar_image.is_none() && contact.avatar_color.is_none() {
            contact.avatar_color = Some(palette_color(&RecordId::from_key(contact.id.clone())).to_string());
        }
    }
}

/// Split a name-sorted contact list into runs sharing a group letter
pub fn group_by_letter(contacts: Vec<Contact>) -> Vec<(char, Vec<Contact>)> {
    let mut groups: Vec<(char, Vec<Contact>)> = Vec::new();
    for contact in contacts {
        let letter = contact.group_letter();
        match groups.last_mut() {
            Some((current, members)) if *current == letter => members.push(contact),
            _ => groups.push((letter, vec![contact])),
        }
    }
    groups
}

/// First letter of the first and last name words, uppercased
pub fn initials_of(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let first = words.first().and_then(|w| w.chars().next());
    let last = if words.len() > 1 {
        words.last().and_then(|w| w.chars().next())
    } else {
        None
    };
    first.into_iter().chain(last).flat_map(char::to_uppercase).collect()
}

/// A one-element list comes back from the store as its bare element
fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(id)) => vec![id],
        Some(OneOrMany::Many(ids)) => ids,
    })
}

fn palette_color(id: &RecordId) -> &'static str {
    let n = id.number().unwrap_or(0) as usize;
    AVATAR_PALETTE[n % AVATAR_PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        assert_eq!(initials_of("Anja Schulz"), "AS");
        assert_eq!(initials_of("benedikt ziegler von hall"), "BH");
        assert_eq!(initials_of("Eva"), "E");
        assert_eq!(initials_of("   "), "");
    }

    #[test]
    fn test_draft_picks_palette_color() {
        let id = RecordId::new("contact", 1);
        let contact = ContactDraft { name: "Tatjana Wolf".into(), ..Default::default() }.into_contact(&id);
        assert_eq!(contact.id, "contact-001");
        assert_eq!(contact.initials, "TW");
        assert_eq!(contact.avatar_color.as_deref(), Some(AVATAR_PALETTE[1]));
    }

    #[test]
    fn test_group_letter() {
        let contact = |name: &str| Contact { name: name.into(), ..Default::default() };
        assert_eq!(contact("anton Maier").group_letter(), 'A');
        assert_eq!(contact("  eva").group_letter(), 'E');
        assert_eq!(contact("").group_letter(), '#');
    }

    #[test]
    fn test_group_by_letter() {
        let contact = |name: &str| Contact { name: name.into(), ..Default::default() };
        let groups = group_by_letter(vec![contact("Anja"), contact("anton"), contact("Eva"), contact("Tatjana")]);
        let letters: Vec<char> = groups.iter().map(|(l, _)| *l).collect();
        assert_eq!(letters, vec!['A', 'E', 'T']);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn test_assigned_to_accepts_single_id() {
        let single: Contact = serde_json::from_value(serde_json::json!({ "name": "Eva", "assignedTo": "task-001" })).unwrap();
        assert_eq!(single.assigned_to, vec!["task-001".to_string()]);
        let many: Contact = serde_json::from_value(serde_json::json!({ "assignedTo": ["task-001", "task-002"] })).unwrap();
        assert_eq!(many.assigned_to.len(), 2);
        let null: Contact = serde_json::from_value(serde_json::json!({ "assignedTo": null })).unwrap();
        assert!(null.assigned_to.is_empty());
    }

    #[test]
    fn test_image_replaces_color() {
        let id = RecordId::new("contact", 2);
        let mut contact = ContactDraft { name: "Marcel Bauer".into(), ..Default::default() }.into_contact(&id);
        let image = AvatarImage { name: "me.png".into(), mime_type: "image/png".into(), size: 10, data: "aGk=".into() };
        ContactDraft { name: "Marcel Bauer".into(), avatar_image: Some(image), ..Default::default() }.apply_to(&mut contact);
        assert!(contact.avatar_color.is_none());
        assert!(contact.avatar_image.is_some());
    }
}
