//! Static table registry: the closed set of tables the API operates on, their required fields and column types.

/// Fields whose values must coerce to a number when present.
pub const NUMERIC_FIELDS: &[&str] = &["price", "stock", "age"];

/// Tables exposed through the generic CRUD routes. Identifiers used in SQL come only from here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableName {
    Pets,
    Tutors,
    Services,
    Products,
    Appointments,
}

impl TableName {
    pub const ALL: [TableName; 5] = [
        TableName::Pets,
        TableName::Tutors,
        TableName::Services,
        TableName::Products,
        TableName::Appointments,
    ];

    /// Resolve a path segment to a table. Surrounding whitespace and trailing slashes are ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let name = raw.trim().trim_end_matches('/');
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TableName::Pets => "pets",
            TableName::Tutors => "tutors",
            TableName::Services => "services",
            TableName::Products => "products",
            TableName::Appointments => "appointments",
        }
    }

    pub fn spec(self) -> &'static TableSpec {
        match self {
            TableName::Pets => &PETS,
            TableName::Tutors => &TUTORS,
            TableName::Services => &SERVICES,
            TableName::Products => &PRODUCTS,
            TableName::Appointments => &APPOINTMENTS,
        }
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Serial,
    Int,
    Text,
    Numeric,
    Timestamp,
}

impl ColumnType {
    /// PostgreSQL type used for placeholder casts.
    pub fn pg_type(self) -> &'static str {
        match self {
            ColumnType::Serial | ColumnType::Int => "int4",
            ColumnType::Text => "text",
            ColumnType::Numeric => "numeric",
            ColumnType::Timestamp => "timestamp",
        }
    }
}

#[derive(Debug)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
}

const fn col(name: &'static str, ty: ColumnType) -> Column {
    Column { name, ty }
}

#[derive(Debug)]
pub struct TableSpec {
    /// Fields every create/update payload must carry, in check order.
    pub required: &'static [&'static str],
    /// Physical columns, `id` first.
    pub columns: &'static [Column],
}

impl TableSpec {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

use ColumnType::*;

static PETS: TableSpec = TableSpec {
    required: &["name", "species", "breed", "age", "tutor_id"],
    columns: &[
        col("id", Serial),
        col("name", Text),
        col("species", Text),
        col("breed", Text),
        col("age", Int),
        col("tutor_id", Int),
    ],
};

static TUTORS: TableSpec = TableSpec {
    required: &["name"],
    columns: &[
        col("id", Serial),
        col("name", Text),
        col("phone", Text),
        col("address", Text),
    ],
};

static SERVICES: TableSpec = TableSpec {
    required: &["name", "description", "price"],
    columns: &[
        col("id", Serial),
        col("name", Text),
        col("description", Text),
        col("price", Numeric),
    ],
};

static PRODUCTS: TableSpec = TableSpec {
    required: &["name", "description", "price", "stock"],
    columns: &[
        col("id", Serial),
        col("name", Text),
        col("description", Text),
        col("price", Numeric),
        col("stock", Int),
    ],
};

static APPOINTMENTS: TableSpec = TableSpec {
    required: &["tutor_id", "pet_id", "service_id", "datetime", "status"],
    columns: &[
        col("id", Serial),
        col("tutor_id", Int),
        col("pet_id", Int),
        col("service_id", Int),
        col("datetime", Timestamp),
        col("status", Text),
    ],
};

/// Required fields for a raw table name, or `None` when the table is not exposed.
pub fn fields_for(raw: &str) -> Option<&'static [&'static str]> {
    TableName::parse(raw).map(|t| t.spec().required)
}
