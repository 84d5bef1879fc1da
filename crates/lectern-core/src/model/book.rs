use serde::{Deserialize, Serialize};

use lectern_api::FilePart;

use super::{EntityId, lenient};
use crate::error::CoreError;
use crate::resource::{FormMode, Resource, ResourceForm, require};

/// Library book with a cover image and optional downloadable file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub isbn: String,
    #[serde(default)]
    pub category_id: Option<EntityId>,
    /// URL of the stored cover, when one was uploaded.
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub description: String,
    pub isbn: String,
    pub category_id: Option<EntityId>,
    pub is_featured: bool,
    pub is_active: bool,
    #[serde(skip)]
    pub cover_image: Option<FilePart>,
    #[serde(skip)]
    pub book_file: Option<FilePart>,
}

impl Default for BookForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            description: String::new(),
            isbn: String::new(),
            category_id: None,
            is_featured: false,
            is_active: true,
            cover_image: None,
            book_file: None,
        }
    }
}

impl ResourceForm for BookForm {
    const FILE_BEARING: bool = true;

    fn validate(&self, _mode: FormMode) -> Result<(), CoreError> {
        require("Title", &self.title)?;
        require("Author", &self.author)?;
        let digits = self.isbn.chars().filter(char::is_ascii_digit).count();
        if !self.isbn.trim().is_empty() && digits != 10 && digits != 13 {
            return Err(CoreError::validation("ISBN must have 10 or 13 digits"));
        }
        Ok(())
    }

    fn attachments(&self) -> Vec<FilePart> {
        self.cover_image
            .iter()
            .chain(self.book_file.iter())
            .cloned()
            .collect()
    }

    fn attach(&mut self, part: FilePart) -> Result<(), CoreError> {
        match part.field.as_str() {
            "cover_image" => self.cover_image = Some(part),
            "book_file" => self.book_file = Some(part),
            other => {
                return Err(CoreError::validation(format!(
                    "books accept cover_image or book_file, not '{other}'"
                )));
            }
        }
        Ok(())
    }
}

impl Resource for Book {
    type Form = BookForm;

    const COLLECTION: &'static str = "books";
    const LABEL: &'static str = "Book";
    const ACTIONS: &'static [&'static str] = &["toggle-featured"];

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn to_form(&self) -> BookForm {
        BookForm {
            title: self.title.clone(),
            author: self.author.clone(),
            description: self.description.clone(),
            isbn: self.isbn.clone(),
            category_id: self.category_id.clone(),
            is_featured: self.is_featured,
            is_active: self.is_active,
            cover_image: None,
            book_file: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lectern_api::RequestBody;

    use super::*;

    #[test]
    fn cover_travels_as_file_part() {
        let mut form = BookForm {
            title: "Confessions".into(),
            author: "Augustine".into(),
            ..BookForm::default()
        };
        form.attach(FilePart::new("cover_image", "c.jpg", "image/jpeg", vec![0xff, 0xd8]))
            .unwrap();
        let RequestBody::Multipart(payload) = form.body().unwrap() else {
            panic!("expected multipart body");
        };
        assert_eq!(payload.files().len(), 1);
        assert_eq!(payload.files()[0].field, "cover_image");
        // Null category is omitted rather than sent as an empty string.
        assert_eq!(payload.field("category_id"), None);
    }

    #[test]
    fn isbn_digit_count() {
        let mut form = BookForm {
            title: "T".into(),
            author: "A".into(),
            isbn: "978-0-14-044114-5".into(),
            ..BookForm::default()
        };
        assert!(form.validate(FormMode::Create).is_ok());
        form.isbn = "12345".into();
        assert!(form.validate(FormMode::Create).is_err());
    }
}
