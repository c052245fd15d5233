// Schema IR handed to emitters. No serde_json::Value here.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Index of a class inside one [`SchemaGraph`]. Ids are allocated in
/// discovery order; the root is always `ClassId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClassId(pub u32);

impl ClassId {
    pub const ROOT: ClassId = ClassId(0);
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum TypeKind {
    Null,
    Boolean,
    Integer,
    Long,
    Float,
    String,
    Date,
    Array(Box<TypeDescriptor>),
    Dictionary(Box<TypeDescriptor>),
    /// `None` until the builder has produced the class for this shape.
    Object(Option<ClassId>),
    /// `{}`: an object with no members says nothing about its keys, so it
    /// joins with both objects and dictionaries. The builder turns any that
    /// survive into an (empty) class.
    EmptyObject,
    /// Irreconcilable samples; top of the lattice.
    Anything,
    /// Element type of an empty array: no evidence at all.
    Unconstrained,
}

impl TypeKind {
    /// Kinds that admit null on their own, whatever the flag says.
    pub fn absorbs_null(&self) -> bool {
        matches!(self, TypeKind::Null | TypeKind::Anything | TypeKind::Unconstrained)
    }
}

/// Inferred shape of one JSON slot.
///
/// `nullable` is normalized at construction: kinds that absorb null always
/// report `true`, so two descriptors compare equal iff they describe the same
/// set of values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeDescriptor {
    #[serde(flatten)]
    pub kind: TypeKind,
    nullable: bool,
}

impl TypeDescriptor {
    pub fn new(kind: TypeKind) -> Self {
        let nullable = kind.absorbs_null();
        Self { kind, nullable }
    }

    pub fn null() -> Self { Self::new(TypeKind::Null) }
    pub fn boolean() -> Self { Self::new(TypeKind::Boolean) }
    pub fn integer() -> Self { Self::new(TypeKind::Integer) }
    pub fn long() -> Self { Self::new(TypeKind::Long) }
    pub fn float() -> Self { Self::new(TypeKind::Float) }
    pub fn string() -> Self { Self::new(TypeKind::String) }
    pub fn date() -> Self { Self::new(TypeKind::Date) }
    pub fn anything() -> Self { Self::new(TypeKind::Anything) }
    pub fn unconstrained() -> Self { Self::new(TypeKind::Unconstrained) }
    pub fn object() -> Self { Self::new(TypeKind::Object(None)) }

    pub fn array(elem: TypeDescriptor) -> Self {
        Self::new(TypeKind::Array(Box::new(elem)))
    }

    pub fn dictionary(value: TypeDescriptor) -> Self {
        Self::new(TypeKind::Dictionary(Box::new(value)))
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable || self.kind.absorbs_null();
        self
    }

    pub fn into_nullable(self) -> Self {
        self.with_nullable(true)
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Follows array/dictionary nesting down to the first non-container kind.
    pub fn innermost(&self) -> &TypeDescriptor {
        match &self.kind {
            TypeKind::Array(inner) | TypeKind::Dictionary(inner) => inner.innermost(),
            _ => self,
        }
    }

    fn innermost_mut(&mut self) -> &mut TypeDescriptor {
        match self.kind {
            TypeKind::Array(ref mut inner) | TypeKind::Dictionary(ref mut inner) => inner.innermost_mut(),
            _ => self,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, TypeKind::Array(_) | TypeKind::Dictionary(_))
    }

    /// Class referenced by this descriptor, looking through containers.
    pub fn class_ref(&self) -> Option<ClassId> {
        match self.innermost().kind {
            TypeKind::Object(id) => id,
            _ => None,
        }
    }

    /// True when the innermost kind still needs a class.
    pub fn wants_class(&self) -> bool {
        matches!(self.innermost().kind, TypeKind::Object(_) | TypeKind::EmptyObject)
    }

    /// Points the innermost object placeholder at `id`. No-op when the
    /// innermost kind is not an object.
    pub fn link_class(&mut self, id: ClassId) {
        let inner = self.innermost_mut();
        if matches!(inner.kind, TypeKind::Object(_) | TypeKind::EmptyObject) {
            inner.kind = TypeKind::Object(Some(id));
        }
    }

    /// Replaces the innermost kind, keeping every nullable flag on the way.
    pub fn replace_innermost(&mut self, kind: TypeKind) {
        let inner = self.innermost_mut();
        let nullable = inner.nullable;
        *inner = TypeDescriptor::new(kind).with_nullable(nullable);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    /// Literal JSON member name.
    pub source_key: String,
    /// Member name for generated code; unique within its class.
    pub identifier: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSchema {
    pub id: ClassId,
    pub name: String,
    pub is_root: bool,
    pub fields: Vec<FieldSchema>, // first-observation order
    pub has_nested_classes: bool,
}

impl ClassSchema {
    pub fn field(&self, source_key: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.source_key == source_key)
    }
}

/// Every class inferred by one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaGraph {
    pub root: ClassSchema,
    /// Completion order: a class appears before any class that references it.
    #[serde(serialize_with = "serialize_classes")]
    pub secondary: IndexMap<ClassId, ClassSchema>,
}

impl SchemaGraph {
    pub fn new(root: ClassSchema, secondary: IndexMap<ClassId, ClassSchema>) -> Self {
        Self { root, secondary }
    }

    pub fn class(&self, id: ClassId) -> Option<&ClassSchema> {
        if id == self.root.id {
            Some(&self.root)
        } else {
            self.secondary.get(&id)
        }
    }

    pub fn class_by_name(&self, name: &str) -> Option<&ClassSchema> {
        self.classes().find(|c| c.name == name)
    }

    /// Root first, then secondary classes in completion order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassSchema> {
        std::iter::once(&self.root).chain(self.secondary.values())
    }

    pub fn len(&self) -> usize {
        1 + self.secondary.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Name a descriptor's class reference resolves to, if any.
    pub fn class_name_of(&self, ty: &TypeDescriptor) -> Option<&str> {
        ty.class_ref().and_then(|id| self.class(id)).map(|c| c.name.as_str())
    }
}

fn serialize_classes<S: Serializer>(
    classes: &IndexMap<ClassId, ClassSchema>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(classes.values())
}
