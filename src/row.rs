//! The fixed row shape this store persists: `(id, username, email)`.
use crate::errors::Error;

pub const ID_SIZE: usize = 4;
pub const USERNAME_SIZE: usize = 33;
pub const EMAIL_SIZE: usize = 256;
pub const ID_OFFSET: usize = 0;
pub const USERNAME_OFFSET: usize = ID_OFFSET + ID_SIZE;
pub const EMAIL_OFFSET: usize = USERNAME_OFFSET + USERNAME_SIZE;
pub const ROW_SIZE: usize = ID_SIZE + USERNAME_SIZE + EMAIL_SIZE;

pub const USERNAME_MAX_LEN: usize = USERNAME_SIZE - 1;
pub const EMAIL_MAX_LEN: usize = EMAIL_SIZE - 1;

/// One row in the table. `username`/`email` are stored nul-terminated and
/// nul-padded to their fixed field width on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    pub username: String,
    pub email: String,
}

impl Row {
    pub fn new(id: u32, username: impl Into<String>, email: impl Into<String>) -> Row {
        Row {
            id,
            username: username.into(),
            email: email.into(),
        }
    }

    /// Writes this row into `dest` at the byte-exact offsets the on-disk
    /// layout fixes. `dest` must be at least `ROW_SIZE` bytes.
    pub fn serialize(&self, dest: &mut [u8]) {
        debug_assert!(dest.len() >= ROW_SIZE);
        dest[ID_OFFSET..ID_OFFSET + ID_SIZE].copy_from_slice(&self.id.to_ne_bytes());

        let username_field = &mut dest[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE];
        write_fixed_str(username_field, &self.username);

        let email_field = &mut dest[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE];
        write_fixed_str(email_field, &self.email);
    }

    /// Reads a row out of `src`, stopping each string field at its first
    /// nul byte (or the end of the field, whichever comes first).
    pub fn deserialize(src: &[u8]) -> Result<Row, Error> {
        debug_assert!(src.len() >= ROW_SIZE);
        let mut id_bytes = [0u8; ID_SIZE];
        id_bytes.copy_from_slice(&src[ID_OFFSET..ID_OFFSET + ID_SIZE]);
        let id = u32::from_ne_bytes(id_bytes);

        let username = read_fixed_str(&src[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE])?;
        let email = read_fixed_str(&src[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE])?;

        Ok(Row { id, username, email })
    }
}

fn write_fixed_str(field: &mut [u8], s: &str) {
    let bytes = s.as_bytes();
    field[..bytes.len()].copy_from_slice(bytes);
    for b in &mut field[bytes.len()..] {
        *b = 0;
    }
}

fn read_fixed_str(field: &[u8]) -> Result<String, Error> {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    std::str::from_utf8(&field[..end])
        .map(str::to_owned)
        .map_err(|e| Error::Fatal(format!("row field is not valid utf-8: {e}")))
}

impl std::fmt::Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_a_page_buffer() {
        let row = Row::new(1, "user1", "person1@example.com");
        let mut buf = [0u8; ROW_SIZE];
        row.serialize(&mut buf);
        let back = Row::deserialize(&buf).unwrap();
        assert_eq!(row, back);
    }

    #[test]
    fn pads_short_fields_with_nul_bytes() {
        let row = Row::new(7, "ab", "c@d.com");
        let mut buf = [0xffu8; ROW_SIZE];
        row.serialize(&mut buf);
        assert_eq!(buf[USERNAME_OFFSET + 2], 0);
        assert_eq!(buf[EMAIL_OFFSET + 7], 0);
    }

    #[test]
    fn max_length_fields_fill_the_entire_buffer() {
        let username = "a".repeat(USERNAME_MAX_LEN);
        let email = "b".repeat(EMAIL_MAX_LEN);
        let row = Row::new(1, username.clone(), email.clone());
        let mut buf = [0u8; ROW_SIZE];
        row.serialize(&mut buf);
        let back = Row::deserialize(&buf).unwrap();
        assert_eq!(back.username, username);
        assert_eq!(back.email, email);
    }
}
