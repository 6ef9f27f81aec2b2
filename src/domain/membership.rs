//! Member Management
//!
//! Adding, renaming and removing members. Records are filed under the
//! member name, so a rename re-keys every recorded day.

use super::entity::{clean_name, key_taken, DomainError, DomainResult};
use super::member::Member;
use super::state::DiaryState;

impl DiaryState {
    /// First-run setup and later additions
    pub fn add_member(&mut self, name: &str, enable_notes: bool) -> DomainResult<Member> {
        let name = clean_name(name, "Member")?;
        if key_taken(&self.config.members, &name) {
            return Err(DomainError::Conflict(format!("Member '{}' already exists", name)));
        }
        let mut member = Member::new(name);
        member.enable_notes = enable_notes;
        self.config.members.push(member.clone());
        log::info!("Added member '{}'", member.name);
        Ok(member)
    }

    /// Rename a member and move every record filed under the old name.
    ///
    /// The new name must be free both as a member and as a record key.
    pub fn rename_member(&mut self, old: &str, new: &str) -> DomainResult<bool> {
        let new = clean_name(new, "Member")?;
        if self.member(old).is_none() {
            log::warn!("rename_member: no member named '{}'", old);
            return Ok(false);
        }
        if new == old {
            return Ok(true);
        }
        if key_taken(&self.config.members, &new) {
            return Err(DomainError::Conflict(format!("Member '{}' already exists", new)));
        }
        if self.measures.values().any(|day| day.contains_key(&new)) {
            return Err(DomainError::Conflict(format!(
                "Records already exist under the name '{}'",
                new
            )));
        }

        if let Some(member) = self.member_mut(old) {
            member.name = new.clone();
        }
        let mut moved = 0;
        for day in self.measures.values_mut() {
            if let Some(record) = day.remove(old) {
                day.insert(new.clone(), record);
                moved += 1;
            }
        }
        if self.selected_name() == Some(old) {
            self.set_selected(Some(new.clone()));
        }
        log::info!("Renamed member '{}' to '{}' ({} days moved)", old, new, moved);
        Ok(true)
    }

    /// Remove a member together with all of their records
    pub fn remove_member(&mut self, name: &str, confirmed: bool) -> DomainResult<bool> {
        if !confirmed {
            return Err(DomainError::InvalidInput(
                "Removing a member erases their history and must be confirmed".into(),
            ));
        }
        let before = self.config.members.len();
        self.config.members.retain(|m| m.name != name);
        if self.config.members.len() == before {
            log::warn!("remove_member: no member named '{}'", name);
            return Ok(false);
        }
        for day in self.measures.values_mut() {
            day.remove(name);
        }
        self.measures.retain(|_, day| !day.is_empty());
        if self.selected_name() == Some(name) {
            self.set_selected(None);
        }
        log::info!("Removed member '{}'", name);
        Ok(true)
    }

    pub fn set_notes_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.member_mut(name) {
            Some(member) => {
                member.enable_notes = enabled;
                true
            }
            None => {
                log::warn!("set_notes_enabled: no member named '{}'", name);
                false
            }
        }
    }
}
