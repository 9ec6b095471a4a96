//! Custom fields (`/fields/content/articles`, `/fields/content/categories`)
//!
//! Joomla stores the per-type settings of a field in `fieldparams`. Only the
//! settings belonging to the chosen type are read, so a form that switched
//! types never leaks stale values into the request.

use anyhow::Result;
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace, warn};

use super::{fetch_listing, record_endpoint, unsupported, Listing};
use crate::joomla::{HttpMethod, JoomlaClient, NodeError};
use crate::node::params::{member_string, Parameters};
use crate::resource::field_mapper::{copy_fields, slugify, JsonText};
use crate::resource::protocol::{
    Operation, Resource, ARTICLE_FIELDS_ENDPOINT, CATEGORY_FIELDS_ENDPOINT,
};

/// Starting point of the choice options editor
pub const OPTIONS_TEMPLATE: &str = r#"{"options": {"options0": {"name": "Option 1", "value": "option1"}, "options1": {"name": "Option 2", "value": "option2"}}}"#;

/// Content type a field is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldContext {
    Article,
    Category,
}

impl FieldContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldContext::Article => "com_content.article",
            FieldContext::Category => "com_content.categories",
        }
    }

    /// Anything but the article context addresses category fields
    pub fn from_param(value: &str) -> Self {
        if value == FieldContext::Article.as_str() {
            FieldContext::Article
        } else {
            FieldContext::Category
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            FieldContext::Article => ARTICLE_FIELDS_ENDPOINT,
            FieldContext::Category => CATEGORY_FIELDS_ENDPOINT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Textarea,
    Editor,
    List,
    Radio,
    Checkboxes,
    Calendar,
    Media,
    Url,
    Email,
    Integer,
    Color,
    User,
    Sql,
}

impl FieldType {
    pub const ALL: [FieldType; 14] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Editor,
        FieldType::List,
        FieldType::Radio,
        FieldType::Checkboxes,
        FieldType::Calendar,
        FieldType::Media,
        FieldType::Url,
        FieldType::Email,
        FieldType::Integer,
        FieldType::Color,
        FieldType::User,
        FieldType::Sql,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Editor => "editor",
            FieldType::List => "list",
            FieldType::Radio => "radio",
            FieldType::Checkboxes => "checkboxes",
            FieldType::Calendar => "calendar",
            FieldType::Media => "media",
            FieldType::Url => "url",
            FieldType::Email => "email",
            FieldType::Integer => "integer",
            FieldType::Color => "color",
            FieldType::User => "user",
            FieldType::Sql => "sql",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Textarea => "Textarea",
            FieldType::Editor => "Editor",
            FieldType::List => "List (Dropdown)",
            FieldType::Radio => "Radio",
            FieldType::Checkboxes => "Checkboxes",
            FieldType::Calendar => "Calendar (Date)",
            FieldType::Media => "Media (Image)",
            FieldType::Url => "URL",
            FieldType::Email => "Email",
            FieldType::Integer => "Integer",
            FieldType::Color => "Color",
            FieldType::User => "User",
            FieldType::Sql => "SQL",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown field type '{}'", s))
    }
}

/// Type-specific settings sent as `fieldparams`
#[derive(Debug, Clone, PartialEq)]
pub enum FieldParams {
    /// list, radio and checkboxes; `multiple`/`header` only apply to lists
    Choices {
        options: Map<String, Value>,
        multiple: Option<bool>,
        header: Option<String>,
    },
    Integer {
        first: i64,
        last: i64,
        step: i64,
    },
    Url {
        relative: bool,
        schemes: Vec<String>,
        show_url: bool,
    },
    Calendar {
        format: String,
        showtime: bool,
    },
    Text {
        maxlength: i64,
    },
    Textarea {
        rows: i64,
        cols: i64,
        maxlength: i64,
    },
    Editor {
        buttons: bool,
        width: String,
        height: String,
    },
    Media {
        directory: String,
        preview: String,
    },
    Sql {
        query: String,
        header: String,
        multiple: bool,
    },
    /// email, color and user take no settings
    Empty,
}

/// Options blob of a choice field. Anything but a JSON object is ignored.
fn choice_options(value: Value) -> Map<String, Value> {
    let parsed = match value {
        Value::String(text) => JsonText::parse(&text),
        other => JsonText::Parsed(other),
    };
    match parsed {
        JsonText::Parsed(Value::Object(options)) => options,
        other => {
            trace!("Ignoring field options that are not a JSON object: {:?}", other);
            Map::new()
        }
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

impl FieldParams {
    pub fn bind(field_type: FieldType, params: &Parameters<'_>) -> Result<Self> {
        Ok(match field_type {
            FieldType::List | FieldType::Radio | FieldType::Checkboxes => {
                let is_list = field_type == FieldType::List;
                FieldParams::Choices {
                    options: choice_options(params.value("fieldparams")),
                    multiple: if is_list {
                        Some(params.boolean("listMultiple")?)
                    } else {
                        None
                    },
                    header: if is_list {
                        non_empty(params.string("listHeader")?)
                    } else {
                        None
                    },
                }
            }
            FieldType::Integer => FieldParams::Integer {
                first: params.integer("integerFirst")?,
                last: params.integer("integerLast")?,
                step: params.integer("integerStep")?,
            },
            FieldType::Url => FieldParams::Url {
                relative: params.boolean("urlRelative")?,
                schemes: params.string_list("urlSchemes")?,
                show_url: params.boolean("urlShowUrl")?,
            },
            FieldType::Calendar => FieldParams::Calendar {
                format: params.string("calendarFormat")?,
                showtime: params.boolean("calendarShowtime")?,
            },
            FieldType::Text => FieldParams::Text {
                maxlength: params.integer("textMaxlength")?,
            },
            FieldType::Textarea => FieldParams::Textarea {
                rows: params.integer("textareaRows")?,
                cols: params.integer("textareaCols")?,
                maxlength: params.integer("textareaMaxlength")?,
            },
            FieldType::Editor => FieldParams::Editor {
                buttons: params.boolean("editorButtons")?,
                width: params.string("editorWidth")?,
                height: params.string("editorHeight")?,
            },
            FieldType::Media => FieldParams::Media {
                directory: params.string("mediaDirectory")?,
                preview: params.string("mediaPreview")?,
            },
            FieldType::Sql => FieldParams::Sql {
                query: params.string("sqlQuery")?,
                header: params.string("sqlHeader")?,
                multiple: params.boolean("sqlMultiple")?,
            },
            FieldType::Email | FieldType::Color | FieldType::User => FieldParams::Empty,
        })
    }

    pub fn into_map(self) -> Map<String, Value> {
        let mut map = Map::new();
        let mut set = |key: &str, value: Value| {
            map.insert(key.to_string(), value);
        };
        match self {
            FieldParams::Choices {
                options,
                multiple,
                header,
            } => {
                for (key, value) in options {
                    set(&key, value);
                }
                if let Some(multiple) = multiple {
                    set("multiple", Value::from(multiple));
                }
                if let Some(header) = header {
                    set("header", Value::from(header));
                }
            }
            FieldParams::Integer { first, last, step } => {
                set("first", Value::from(first));
                set("last", Value::from(last));
                set("step", Value::from(step));
            }
            FieldParams::Url {
                relative,
                schemes,
                show_url,
            } => {
                set("relative", Value::from(relative));
                set("schemes", Value::from(schemes));
                set("show_url", Value::from(show_url));
            }
            FieldParams::Calendar { format, showtime } => {
                set("format", Value::from(format));
                set("showtime", Value::from(showtime));
            }
            FieldParams::Text { maxlength } => {
                if maxlength > 0 {
                    set("maxlength", Value::from(maxlength));
                }
            }
            FieldParams::Textarea {
                rows,
                cols,
                maxlength,
            } => {
                set("rows", Value::from(rows));
                set("cols", Value::from(cols));
                if maxlength > 0 {
                    set("maxlength", Value::from(maxlength));
                }
            }
            FieldParams::Editor {
                buttons,
                width,
                height,
            } => {
                set("buttons", Value::from(buttons));
                set("width", Value::from(width));
                set("height", Value::from(height));
            }
            FieldParams::Media { directory, preview } => {
                if !directory.is_empty() {
                    set("directory", Value::from(directory));
                }
                set("preview", Value::from(preview));
            }
            FieldParams::Sql {
                query,
                header,
                multiple,
            } => {
                if !query.is_empty() {
                    set("query", Value::from(query));
                }
                if !header.is_empty() {
                    set("header", Value::from(header));
                }
                set("multiple", Value::from(multiple));
            }
            FieldParams::Empty => {}
        }
        map
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldAction {
    Create {
        title: String,
        field_type: FieldType,
        fields: Map<String, Value>,
        field_params: FieldParams,
    },
    Get {
        id: i64,
    },
    GetAll(Listing),
    Update {
        id: i64,
        fields: Map<String, Value>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRequest {
    pub context: FieldContext,
    pub action: FieldAction,
}

impl FieldRequest {
    pub fn bind(operation: Operation, params: &Parameters<'_>) -> Result<Self> {
        let context = FieldContext::from_param(&params.string("context")?);
        let action = match operation {
            Operation::Create => {
                let type_name = params.string("type")?;
                let field_type: FieldType =
                    type_name.parse().map_err(|reason| NodeError::Parameter {
                        name: "type".to_string(),
                        item_index: params.item_index(),
                        reason,
                    })?;
                FieldAction::Create {
                    title: params.string("title")?,
                    field_type,
                    fields: params.object("additionalFields")?,
                    field_params: FieldParams::bind(field_type, params)?,
                }
            }
            Operation::Get => FieldAction::Get {
                id: params.integer("fieldId")?,
            },
            // the fields API takes no filters
            Operation::GetAll => FieldAction::GetAll(Listing::bind(params, &[])?),
            Operation::Update => FieldAction::Update {
                id: params.integer("fieldId")?,
                fields: params.object("updateFields")?,
            },
            Operation::Delete => FieldAction::Delete {
                id: params.integer("fieldId")?,
            },
            other => return Err(unsupported(Resource::Field, other)),
        };
        Ok(Self { context, action })
    }
}

/// Display settings Joomla expects on every new field
fn base_params() -> Value {
    json!({
        "hint": "",
        "class": "",
        "label_class": "",
        "show_on": "",
        "render_class": "",
        "showlabel": "1",
        "label_render_class": "",
        "display": "2",
        "prefix": "",
        "suffix": "",
        "layout": "",
        "display_readonly": "2",
    })
}

fn create_body(
    context: FieldContext,
    title: String,
    field_type: FieldType,
    mut fields: Map<String, Value>,
    field_params: FieldParams,
) -> Map<String, Value> {
    let name = member_string(&fields, "name").unwrap_or_else(|| slugify(&title));
    let label = member_string(&fields, "label").unwrap_or_else(|| title.clone());
    fields.remove("name");
    fields.remove("label");

    let mut body = Map::new();
    body.insert("title".to_string(), Value::from(title));
    body.insert("name".to_string(), Value::from(name));
    body.insert("label".to_string(), Value::from(label));
    body.insert("type".to_string(), Value::from(field_type.as_str()));
    body.insert("context".to_string(), Value::from(context.as_str()));
    body.insert("description".to_string(), Value::from(""));
    body.insert("params".to_string(), base_params());
    copy_fields(&mut body, &fields, &[]);
    body.insert(
        "fieldparams".to_string(),
        Value::Object(field_params.into_map()),
    );
    body
}

/// Delete, then confirm with a fetch. Joomla only deletes trashed fields
/// and answers success either way.
async fn delete_field(client: &JoomlaClient, endpoint: &str, id: i64) -> Result<Value> {
    let path = record_endpoint(endpoint, id);
    client
        .request(HttpMethod::Delete, &path, Map::new(), Map::new())
        .await?;

    let deleted = json!({
        "success": true,
        "message": format!("Field {} deleted successfully", id),
    });
    match client.get(&path).await {
        Ok(_) => Err(NodeError::FieldNotDeleted { field_id: id }.into()),
        Err(e) if e.is_not_found() => {
            debug!("Field {} is gone after delete", id);
            Ok(deleted)
        }
        Err(e) => {
            warn!(
                "Could not confirm deletion of field {}, assuming deleted: {}",
                id, e
            );
            Ok(deleted)
        }
    }
}

pub async fn handle(client: &JoomlaClient, request: FieldRequest) -> Result<Value> {
    let endpoint = request.context.endpoint();
    let response = match request.action {
        FieldAction::Create {
            title,
            field_type,
            fields,
            field_params,
        } => {
            let body = create_body(request.context, title, field_type, fields, field_params);
            client
                .request(HttpMethod::Post, endpoint, body, Map::new())
                .await?
        }
        FieldAction::Get { id } => client.get(&record_endpoint(endpoint, id)).await?,
        FieldAction::GetAll(listing) => fetch_listing(client, endpoint, listing).await?,
        FieldAction::Update { id, fields } => {
            let mut body = Map::new();
            copy_fields(&mut body, &fields, &[]);
            client
                .request(
                    HttpMethod::Patch,
                    &record_endpoint(endpoint, id),
                    body,
                    Map::new(),
                )
                .await?
        }
        FieldAction::Delete { id } => delete_field(client, endpoint, id).await?,
    };
    Ok(response)
}
