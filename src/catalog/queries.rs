//! SQL query constants for the PostgreSQL catalog

/// Database product and version string
pub const PRODUCT_VERSION: &str = "SELECT version()";

/// Base tables of one schema
pub const LIST_TABLES: &str = r#"
    SELECT t.table_name::text AS table_name
    FROM information_schema.tables t
    WHERE t.table_schema = $1
      AND t.table_type = 'BASE TABLE'
    ORDER BY t.table_name
"#;

/// Columns of one table in ordinal order
pub const LIST_COLUMNS: &str = r#"
    SELECT
        c.column_name::text AS column_name,
        c.data_type::text AS data_type
    FROM information_schema.columns c
    WHERE c.table_schema = $1 AND c.table_name = $2
    ORDER BY c.ordinal_position
"#;

/// Primary key columns of one table
pub const LIST_PRIMARY_KEYS: &str = r#"
    SELECT kcu.column_name::text AS column_name
    FROM information_schema.table_constraints tc
    JOIN information_schema.key_column_usage kcu
        ON tc.constraint_name = kcu.constraint_name
        AND tc.table_schema = kcu.table_schema
    WHERE tc.constraint_type = 'PRIMARY KEY'
        AND tc.table_schema = $1
        AND tc.table_name = $2
    ORDER BY kcu.ordinal_position
"#;

/// Foreign key columns declared on one table, paired with the referenced column
pub const LIST_IMPORTED_KEYS: &str = r#"
    SELECT
        kcu.column_name::text AS fk_column,
        ref.table_name::text AS ref_table,
        ref.column_name::text AS ref_column
    FROM information_schema.table_constraints tc
    JOIN information_schema.key_column_usage kcu
        ON tc.constraint_name = kcu.constraint_name
        AND tc.table_schema = kcu.table_schema
    JOIN information_schema.referential_constraints rc
        ON tc.constraint_name = rc.constraint_name
        AND tc.table_schema = rc.constraint_schema
    JOIN information_schema.key_column_usage ref
        ON ref.constraint_name = rc.unique_constraint_name
        AND ref.constraint_schema = rc.unique_constraint_schema
        AND ref.ordinal_position = kcu.position_in_unique_constraint
    WHERE tc.constraint_type = 'FOREIGN KEY'
        AND tc.table_schema = $1
        AND tc.table_name = $2
    ORDER BY tc.constraint_name, kcu.ordinal_position
"#;
