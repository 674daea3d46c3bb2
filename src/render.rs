//! HTML rendering of archer listings and the static service views.
//!
//! Rows are produced from [`Template`]s made of literal text and named
//! [`Field`] placeholders. A template is resolved in a single pass over its
//! segments, so a value that happens to look like a placeholder is never
//! substituted again and placeholder names cannot collide.
//!
//! Every renderer returns a [`View`]: the title and HTML body that replace
//! the front end's Article region wholesale.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::sync::LazyLock;

use serde_json::Value;

use crate::model::{About, Archer, ArcherSummary};

/// Rendered in place of every field of a record that could not be decoded.
pub const INVALID_FIELD: &str = "undefined";

/// Shown when a home/about payload is missing or incomplete.
pub const INVALID_MESSAGE: &str = "Datos Descargados No válidos";

pub const HOME_TITLE: &str = "Plantilla Home";
pub const ABOUT_TITLE: &str = "Plantilla Acerca de";
pub const SUMMARY_TITLE: &str = "Plantilla del listado de los nombres de todos los arqueros";
pub const FULL_TITLE: &str = "Plantilla del listado de todos los datos de todos los arqueros";
pub const SORTED_TITLE: &str =
    "Plantilla del listado de los nombres de todos los arqueros ordenados";

// ── Fields ────────────────────────────────────────────────────────────────────

/// A substitutable record field, named in templates as `{{<name>}}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Id,
    Name,
    Surname,
    Nationality,
    Age,
    Shot,
    Scores,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Id,
        Field::Name,
        Field::Surname,
        Field::Nationality,
        Field::Age,
        Field::Shot,
        Field::Scores,
    ];

    /// Placeholder name, identical to the wire field name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Id          => "id",
            Self::Name        => "nombre",
            Self::Surname     => "apellido",
            Self::Nationality => "nacionalidad",
            Self::Age         => "edad",
            Self::Shot        => "disparo",
            Self::Scores      => "puntuaciones_de_la_tanda",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Anything that can fill a row template.
pub trait Fields {
    /// Display text for `field`, before HTML escaping.
    fn field(&self, field: Field) -> Cow<'_, str>;
}

impl Fields for Archer {
    fn field(&self, field: Field) -> Cow<'_, str> {
        match field {
            Field::Id          => Cow::Owned(self.id.to_string()),
            Field::Name        => Cow::Borrowed(&self.name),
            Field::Surname     => Cow::Borrowed(&self.surname),
            Field::Nationality => Cow::Borrowed(&self.nationality),
            Field::Age         => Cow::Owned(self.age.to_string()),
            Field::Shot        => Cow::Owned(self.shot.to_string()),
            Field::Scores      => Cow::Owned(
                self.scores.iter().map(ToString::to_string).collect::<Vec<_>>().join(","),
            ),
        }
    }
}

impl Fields for ArcherSummary {
    fn field(&self, field: Field) -> Cow<'_, str> {
        match field {
            Field::Name    => Cow::Borrowed(&self.name),
            Field::Surname => Cow::Borrowed(&self.surname),
            _              => Cow::Borrowed(INVALID_FIELD),
        }
    }
}

/// A listing element as the front end received it: either a decoded record
/// or the invalid-data placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry<T> {
    Valid(T),
    Invalid,
}

impl<T: Fields> Fields for Entry<T> {
    fn field(&self, field: Field) -> Cow<'_, str> {
        match self {
            Self::Valid(record) => record.field(field),
            Self::Invalid => Cow::Borrowed(INVALID_FIELD),
        }
    }
}

// ── Templates ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Field(Field),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown placeholder `{0}`")]
    UnknownPlaceholder(String),

    #[error("unterminated placeholder at byte {0}")]
    Unterminated(usize),
}

/// A row template: literal text interleaved with field placeholders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> Template<'a> {
    /// Parses `{{name}}` placeholders (whitespace inside the braces is
    /// ignored). Every name must be a known [`Field`].
    pub fn parse(src: &'a str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = src;
        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Text(&rest[..open]));
            }
            let after = &rest[open + 2..];
            let close = after
                .find("}}")
                .ok_or_else(|| TemplateError::Unterminated(src.len() - rest.len() + open))?;
            let name = after[..close].trim();
            let field = Field::from_name(name)
                .ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_owned()))?;
            segments.push(Segment::Field(field));
            rest = &after[close + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest));
        }
        Ok(Self { segments })
    }

    /// Appends the template filled from `record` to `out`.
    pub fn render_into<R: Fields + ?Sized>(&self, record: &R, out: &mut String) {
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(field) => escape_into(&record.field(*field), out),
            }
        }
    }

    pub fn render<R: Fields + ?Sized>(&self, record: &R) -> String {
        let mut out = String::new();
        self.render_into(record, &mut out);
        out
    }
}

/// Parses a template compiled into the binary. A bad placeholder there is a
/// programming error, caught by the first test that renders a table.
fn built_in(src: &'static str) -> Template<'static> {
    Template::parse(src).unwrap_or_else(|e| panic!("built-in row template: {e}"))
}

pub const SUMMARY_HEADER: &str = r#"<table width="100%" class="listado_arqueros">
<thead>
    <th width="15%">Nombre</th>
    <th width="15%">Apellido</th>
</thead>
<tbody>"#;

pub const FULL_HEADER: &str = r#"<table width="100%" class="listado_arqueros_completo">
<thead>
    <th>Id</th>
    <th>Nombre</th>
    <th>Apellido</th>
    <th>Nacionalidad</th>
    <th>Edad</th>
    <th>Disparo</th>
    <th>Puntuaciones de la Tanda</th>
</thead>
<tbody>"#;

pub const TABLE_FOOTER: &str = "</tbody>\n</table>\n";

pub const SUMMARY_ROW_SRC: &str = r#"
<tr title="{{nombre}}">
    <td>{{nombre}}</td>
    <td>{{apellido}}</td>
</tr>
"#;

pub const FULL_ROW_SRC: &str = r#"
<tr title="{{nombre}}">
    <td>{{id}}</td>
    <td>{{nombre}}</td>
    <td>{{apellido}}</td>
    <td>{{nacionalidad}}</td>
    <td>{{edad}}</td>
    <td>{{disparo}}</td>
    <td>{{puntuaciones_de_la_tanda}}</td>
</tr>
"#;

pub static SUMMARY_ROW: LazyLock<Template<'static>> = LazyLock::new(|| built_in(SUMMARY_ROW_SRC));
pub static FULL_ROW: LazyLock<Template<'static>> = LazyLock::new(|| built_in(FULL_ROW_SRC));

// ── Views ─────────────────────────────────────────────────────────────────────

/// A title and HTML body destined for the Article region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View {
    pub title: &'static str,
    pub body: String,
}

fn table<'r, R: Fields + 'r>(
    header: &str,
    row: &Template<'_>,
    records: impl IntoIterator<Item = &'r R>,
) -> String {
    let mut out = String::from(header);
    for record in records {
        row.render_into(record, &mut out);
    }
    out.push_str(TABLE_FOOTER);
    out
}

/// Name and surname of every record, in the order received.
pub fn render_summary_table<R: Fields>(records: &[R]) -> View {
    View { title: SUMMARY_TITLE, body: table(SUMMARY_HEADER, &SUMMARY_ROW, records) }
}

/// Every field of every record, in the order received.
pub fn render_full_table<R: Fields>(records: &[R]) -> View {
    View { title: FULL_TITLE, body: table(FULL_HEADER, &FULL_ROW, records) }
}

/// Like [`render_summary_table`], ordered by [`sort_by_name`].
pub fn render_sorted_summary_table<R: Fields>(records: &[R]) -> View {
    View {
        title: SORTED_TITLE,
        body: table(SUMMARY_HEADER, &SUMMARY_ROW, sort_by_name(records)),
    }
}

/// Records ordered by uppercased `nombre`, ascending. Stable: records whose
/// names compare equal keep their received order. `records` is untouched.
pub fn sort_by_name<R: Fields>(records: &[R]) -> Vec<&R> {
    let mut sorted: Vec<&R> = records.iter().collect();
    sorted.sort_by_cached_key(|r| r.field(Field::Name).to_uppercase());
    sorted
}

/// The home view: the payload's `mensaje`, or [`INVALID_MESSAGE`].
pub fn render_home(payload: Option<&Value>) -> View {
    let message = payload
        .and_then(|p| p.get("mensaje"))
        .and_then(Value::as_str)
        .unwrap_or(INVALID_MESSAGE);
    View { title: HOME_TITLE, body: escape(message) }
}

/// The about view. A payload lacking any of its four fields is replaced as a
/// whole by the invalid-data record.
pub fn render_about(payload: Option<&Value>) -> View {
    let about = payload
        .and_then(|p| serde_json::from_value::<About>(p.clone()).ok())
        .unwrap_or_else(invalid_about);

    let mut body = String::new();
    let _ = write!(
        body,
        "<div>\n<p>{}</p>\n<ul>\n    <li><b>Autor/a</b>: {}</li>\n    <li><b>E-mail</b>: {}</li>\n    <li><b>Fecha</b>: {}</li>\n</ul>\n</div>\n",
        escape(&about.message),
        escape(&about.author),
        escape(&about.email),
        escape(&about.date),
    );
    View { title: ABOUT_TITLE, body }
}

fn invalid_about() -> About {
    About {
        message: INVALID_MESSAGE.to_owned(),
        author: String::new(),
        email: String::new(),
        date: String::new(),
    }
}

// ── Escaping ──────────────────────────────────────────────────────────────────

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(text, &mut out);
    out
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _    => out.push(c),
        }
    }
}
