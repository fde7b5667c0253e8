/// Parsed schema: every table and every reference declared in a DBML file.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
}

impl Diagram {
    /// Tables declared in `schema`, in declaration order.
    pub fn tables_in<'a>(&'a self, schema: &'a str) -> impl Iterator<Item = &'a Table> + 'a {
        self.tables.iter().filter(move |t| t.id.schema == schema)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableId {
    pub schema: String,
    pub name: String,
}

impl TableId {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    pub id: TableId,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub is_pk: bool,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_pk: false,
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_pk = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Relationship {
    pub relation_type: RelationType,
    pub from: EndPoint,
    pub to: EndPoint,
}

impl Relationship {
    /// Split the reference into `(referencing, referenced)` endpoints.
    ///
    /// `>` and `-` refs point from the left-hand side, `<` refs from the
    /// right-hand side. Many-to-many refs have no owning side and yield `None`.
    pub fn foreign_key(&self) -> Option<(&EndPoint, &EndPoint)> {
        match self.relation_type {
            RelationType::ManyToOne | RelationType::OneToOne => Some((&self.from, &self.to)),
            RelationType::OneToMany => Some((&self.to, &self.from)),
            RelationType::ManyToMany => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationType {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

#[derive(Debug, Clone)]
pub struct EndPoint {
    pub table_id: TableId,
    pub column_names: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}
