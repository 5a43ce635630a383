use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Draft;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Url,
    Tel,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    /// Wording used in the missing-field notice; the label when absent.
    #[serde(default)]
    pub notice: Option<String>,
}

impl FieldSpec {
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            notice: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn noticed_as(mut self, wording: &str) -> Self {
        self.notice = Some(wording.to_string());
        self
    }

    pub fn notice_name(&self) -> &str {
        self.notice.as_deref().unwrap_or(&self.label)
    }

    pub fn placeholder(&self) -> String {
        match self.kind {
            FieldKind::Url => format!("{} URL", self.label),
            _ => self.label.clone(),
        }
    }
}

/// Ordered field layout of a record, as shown in the form and the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn validate(&self, draft: &Draft) -> Result<(), Error> {
        let missing: Vec<String> = self
            .fields
            .iter()
            .filter(|field| field.required && draft.get(&field.name).is_empty())
            .map(|field| field.notice_name().to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation { missing })
        }
    }
}

/// Built-in record layouts served by the mock endpoint over time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Revision {
    #[default]
    Contact,
    Directory,
    Academic,
}

impl Revision {
    pub fn schema(self) -> Schema {
        let fields = match self {
            Revision::Contact => vec![
                FieldSpec::new("Name", "Name", FieldKind::Text)
                    .required()
                    .noticed_as("tên"),
                FieldSpec::new("Avatar", "Avatar", FieldKind::Url),
                FieldSpec::new("Phone", "Phone", FieldKind::Text),
            ],
            Revision::Directory => vec![
                FieldSpec::new("name", "Họ tên", FieldKind::Text).required(),
                FieldSpec::new("phone", "Số điện thoại", FieldKind::Tel).required(),
                FieldSpec::new("avatar", "Ảnh đại diện", FieldKind::Url),
            ],
            Revision::Academic => vec![
                FieldSpec::new("mssv", "MSSV", FieldKind::Text).required(),
                FieldSpec::new("ho", "Họ", FieldKind::Text).required(),
                FieldSpec::new("ten", "Tên", FieldKind::Text).required(),
                FieldSpec::new("lop", "Lớp", FieldKind::Text),
                FieldSpec::new("diem1", "Điểm 1", FieldKind::Number),
                FieldSpec::new("diem2", "Điểm 2", FieldKind::Number),
            ],
        };

        Schema {
            name: self.to_string(),
            fields,
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::Contact => f.write_str("contact"),
            Revision::Directory => f.write_str("directory"),
            Revision::Academic => f.write_str("academic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_per_revision() {
        let required = |revision: Revision| -> Vec<String> {
            revision
                .schema()
                .fields
                .into_iter()
                .filter(|field| field.required)
                .map(|field| field.name)
                .collect()
        };

        assert_eq!(required(Revision::Contact), vec!["Name"]);
        assert_eq!(required(Revision::Directory), vec!["name", "phone"]);
        assert_eq!(required(Revision::Academic), vec!["mssv", "ho", "ten"]);
    }

    #[test]
    fn validation_reports_every_missing_label() {
        let schema = Revision::Academic.schema();
        let draft = Draft::empty(&schema).with("ho", "Trần");

        match schema.validate(&draft) {
            Err(Error::Validation { missing }) => {
                assert_eq!(missing, vec!["MSSV".to_string(), "Tên".to_string()]);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let complete = draft.with("mssv", "2051012").with("ten", "Bình");
        assert!(schema.validate(&complete).is_ok());
    }

    #[test]
    fn contact_name_notice_uses_vietnamese_wording() {
        let schema = Revision::Contact.schema();
        let error = schema
            .validate(&Draft::empty(&schema))
            .expect_err("name is required");
        assert_eq!(error.user_summary(), "Vui lòng nhập tên");
    }

    #[test]
    fn whitespace_counts_as_present() {
        let schema = Revision::Contact.schema();
        let draft = Draft::empty(&schema).with("Name", " ");
        assert!(schema.validate(&draft).is_ok());
    }

    #[test]
    fn custom_schema_parses_from_ron() {
        let schema: Schema = ron::from_str(
            r#"(
                name: "custom",
                fields: [
                    (name: "code", label: "Code", kind: Text, required: true),
                    (name: "site", label: "Site", kind: Url),
                ],
            )"#,
        )
        .expect("schema");

        assert_eq!(schema.fields.len(), 2);
        assert!(schema.fields[0].required);
        assert_eq!(schema.fields[0].notice_name(), "Code");
        assert_eq!(schema.fields[1].placeholder(), "Site URL");
    }
}
