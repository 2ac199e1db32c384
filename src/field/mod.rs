//! Field accessors for configuration records
//!
//! A configuration record exposes its static field list through
//! [`Configurable::fields`]. Each [`Field`] pairs declared metadata with a
//! mutable accessor, either to a [`Scalar`] leaf or to a nested record. Loaders
//! never inspect types themselves: they walk the tree with [`visit_scalars`]
//! and read or write leaves through the `Scalar` capability.

use crate::error::Result;

pub mod scalar;

pub use scalar::Scalar;

/// A record whose fields can be populated by the loaders.
///
/// ```rust,ignore
/// impl Configurable for Server {
///     fn fields(&mut self) -> Vec<Field<'_>> {
///         vec![
///             Field::scalar("name", &mut self.name).default_value("api").usage("server name"),
///             Field::scalar("port", &mut self.port).required(),
///             Field::nested("database", &mut self.database),
///         ]
///     }
/// }
/// ```
pub trait Configurable {
    fn fields(&mut self) -> Vec<Field<'_>>;
}

/// A record that carries the reserved explicit config file field.
pub trait ConfPath: Configurable {
    /// Path of a config file to load after the conventional sources, if set.
    fn conf_path(&self) -> Option<&str>;
}

/// Metadata declared on one field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldMeta {
    pub name: &'static str,
    pub default: Option<&'static str>,
    pub required: bool,
    pub usage: &'static str,
    /// Environment variable name override
    pub env: Option<&'static str>,
    /// Flag name override
    pub flag: Option<&'static str>,
    /// File key override
    pub key: Option<&'static str>,
}

pub enum Slot<'a> {
    Scalar(&'a mut dyn Scalar),
    Nested { record: &'a mut dyn Configurable, embedded: bool },
}

/// One entry of a record's field list.
pub struct Field<'a> {
    meta: FieldMeta,
    slot: Slot<'a>,
}

impl<'a> Field<'a> {
    pub fn scalar<T: Scalar + 'a>(name: &'static str, value: &'a mut T) -> Self {
        Self { meta: FieldMeta { name, ..FieldMeta::default() }, slot: Slot::Scalar(value) }
    }

    /// A nested record addressed through its own name (`database.url`,
    /// `DATABASE_URL`, `--database-url`).
    pub fn nested<T: Configurable + 'a>(name: &'static str, record: &'a mut T) -> Self {
        Self {
            meta: FieldMeta { name, ..FieldMeta::default() },
            slot: Slot::Nested { record, embedded: false },
        }
    }

    /// A nested record whose fields are promoted into the parent namespace.
    pub fn embedded<T: Configurable + 'a>(name: &'static str, record: &'a mut T) -> Self {
        Self {
            meta: FieldMeta { name, ..FieldMeta::default() },
            slot: Slot::Nested { record, embedded: true },
        }
    }

    /// Default value in text form, applied by the defaults loader.
    pub fn default_value(mut self, value: &'static str) -> Self {
        self.meta.default = Some(value);
        self
    }

    pub fn required(mut self) -> Self {
        self.meta.required = true;
        self
    }

    /// Help text shown in the flag listing
    pub fn usage(mut self, usage: &'static str) -> Self {
        self.meta.usage = usage;
        self
    }

    pub fn env(mut self, name: &'static str) -> Self {
        self.meta.env = Some(name);
        self
    }

    pub fn flag(mut self, name: &'static str) -> Self {
        self.meta.flag = Some(name);
        self
    }

    pub fn key(mut self, name: &'static str) -> Self {
        self.meta.key = Some(name);
        self
    }
}

/// One step on the way from the root record to a leaf.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub meta: FieldMeta,
    pub embedded: bool,
}

/// Segments from the root record down to a scalar leaf (inclusive).
#[derive(Debug, Clone, Default)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segments that contribute to names; embedded records are skipped.
    pub fn named_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|segment| !segment.embedded)
    }

    pub fn leaf(&self) -> &FieldMeta {
        // A path handed to a visitor always ends in the scalar it describes.
        &self.segments[self.segments.len() - 1].meta
    }

    /// Declared names joined with dots, e.g. `database.url`.
    pub fn dotted(&self) -> String {
        self.named_segments().map(|segment| segment.meta.name).collect::<Vec<_>>().join(".")
    }
}

/// Walk every scalar leaf of `target` in declaration order.
///
/// The first error returned by `visitor` stops the walk.
pub fn visit_scalars(
    target: &mut dyn Configurable,
    visitor: &mut dyn FnMut(&FieldPath, &mut dyn Scalar) -> Result<()>,
) -> Result<()> {
    let mut path = FieldPath::default();
    visit_record(target, &mut path, visitor)
}

fn visit_record(
    record: &mut dyn Configurable,
    path: &mut FieldPath,
    visitor: &mut dyn FnMut(&FieldPath, &mut dyn Scalar) -> Result<()>,
) -> Result<()> {
    for field in record.fields() {
        let Field { meta, slot } = field;
        let outcome = match slot {
            Slot::Scalar(scalar) => {
                path.segments.push(Segment { meta, embedded: false });
                visitor(path, scalar)
            }
            Slot::Nested { record, embedded } => {
                path.segments.push(Segment { meta, embedded });
                visit_record(record, path, visitor)
            }
        };
        path.segments.pop();
        outcome?;
    }
    Ok(())
}
