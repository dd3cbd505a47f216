use super::{Birthday, BookError, Name, Phone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One contact: a name, its phone numbers and an optional birthday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    name: Name,
    #[serde(default)]
    phones: Vec<Phone>,
    #[serde(default)]
    birthday: Option<Birthday>,
}

impl Record {
    pub fn new(name: &str) -> Self {
        Self { name: Name::new(name), phones: Vec::new(), birthday: None }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    pub fn birthday(&self) -> Option<&Birthday> {
        self.birthday.as_ref()
    }

    /// Appends a phone number. Duplicates are kept.
    pub fn add_phone(&mut self, raw: &str) -> Result<(), BookError> {
        self.phones.push(Phone::new(raw)?);
        Ok(())
    }

    pub fn find_phone(&self, value: &str) -> Option<&Phone> {
        self.phones.iter().find(|phone| phone.value() == value)
    }

    /// Rewrites the first phone equal to `old` without moving it
    pub fn edit_phone(&mut self, old: &str, new: &str) -> Result<(), BookError> {
        let phone = self
            .phones
            .iter_mut()
            .find(|phone| phone.value() == old)
            .ok_or_else(|| BookError::phone_not_found(old))?;
        phone.set_value(new)
    }

    pub fn remove_phone(&mut self, value: &str) -> Result<Phone, BookError> {
        let index = self
            .phones
            .iter()
            .position(|phone| phone.value() == value)
            .ok_or_else(|| BookError::phone_not_found(value))?;
        Ok(self.phones.remove(index))
    }

    /// Sets the birthday, replacing any previous one
    pub fn set_birthday(&mut self, raw: &str) -> Result<(), BookError> {
        self.birthday = Some(Birthday::new(raw)?);
        Ok(())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phones: Vec<&str> = self.phones.iter().map(Phone::value).collect();
        write!(f, "Contact name: {}, phones: {}, birthday: ", self.name, phones.join("; "))?;
        match &self.birthday {
            Some(birthday) => write!(f, "{}", birthday),
            None => write!(f, "None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_phone_keeps_duplicates_in_order() {
        let mut record = Record::new("Alice");
        record.add_phone("1112223333").unwrap();
        record.add_phone("4445556666").unwrap();
        record.add_phone("1112223333").unwrap();

        let values: Vec<&str> = record.phones().iter().map(Phone::value).collect();
        assert_eq!(values, vec!["1112223333", "4445556666", "1112223333"]);
    }

    #[test]
    fn test_add_invalid_phone_leaves_record_untouched() {
        let mut record = Record::new("Alice");
        assert!(record.add_phone("123").is_err());
        assert!(record.phones().is_empty());
    }

    #[test]
    fn test_edit_phone_replaces_in_place() {
        let mut record = Record::new("Dave");
        record.add_phone("1111111111").unwrap();
        record.add_phone("5551234567").unwrap();
        record.add_phone("2222222222").unwrap();

        record.edit_phone("5551234567", "5559876543").unwrap();

        assert_eq!(record.phones()[1].value(), "5559876543");
        assert!(record.find_phone("5559876543").is_some());
        assert!(record.find_phone("5551234567").is_none());
    }

    #[test]
    fn test_edit_phone_to_same_value_changes_nothing() {
        let mut record = Record::new("Alice");
        record.add_phone("1112223333").unwrap();
        let before = record.clone();

        record.edit_phone("1112223333", "1112223333").unwrap();

        assert_eq!(record, before);
    }

    #[test]
    fn test_edit_missing_phone_is_not_found() {
        let mut record = Record::new("Alice");
        record.add_phone("1112223333").unwrap();

        let err = record.edit_phone("9999999999", "1234567890").unwrap_err();
        assert_eq!(err, BookError::phone_not_found("9999999999"));
    }

    #[test]
    fn test_edit_phone_with_invalid_new_value_keeps_old() {
        let mut record = Record::new("Alice");
        record.add_phone("1112223333").unwrap();

        let err = record.edit_phone("1112223333", "abc").unwrap_err();
        assert!(matches!(err, BookError::InvalidFormat { .. }));
        assert_eq!(record.phones()[0].value(), "1112223333");
    }

    #[test]
    fn test_remove_phone_removes_first_match_only() {
        let mut record = Record::new("Alice");
        record.add_phone("1112223333").unwrap();
        record.add_phone("1112223333").unwrap();

        let removed = record.remove_phone("1112223333").unwrap();
        assert_eq!(removed.value(), "1112223333");
        assert_eq!(record.phones().len(), 1);

        record.remove_phone("1112223333").unwrap();
        assert_eq!(record.remove_phone("1112223333"), Err(BookError::phone_not_found("1112223333")));
    }

    #[test]
    fn test_set_birthday_replaces_existing() {
        let mut record = Record::new("Alice");
        record.set_birthday("01.02.1990").unwrap();
        record.set_birthday("03.04.1991").unwrap();
        assert_eq!(record.birthday().unwrap().to_string(), "03.04.1991");

        assert!(record.set_birthday("31.04.1991").is_err());
        assert_eq!(record.birthday().unwrap().to_string(), "03.04.1991");
    }

    #[test]
    fn test_display() {
        let mut record = Record::new("Alice");
        assert_eq!(record.to_string(), "Contact name: Alice, phones: , birthday: None");

        record.add_phone("1112223333").unwrap();
        record.add_phone("4445556666").unwrap();
        record.set_birthday("15.06.1990").unwrap();
        assert_eq!(
            record.to_string(),
            "Contact name: Alice, phones: 1112223333; 4445556666, birthday: 15.06.1990"
        );
    }
}
