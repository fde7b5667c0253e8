use crate::error::AppError;
use crate::ir::{Column, Diagram, EndPoint, RelationType, Relationship, Table, TableId};

const DEFAULT_SCHEMA: &str = "public";

/// Parse a DBML string into a Diagram.
pub fn parse_dbml(input: &str) -> Result<Diagram, AppError> {
    let schema = dbml_rs::parse_dbml(input).map_err(|e| AppError::ParseError(format!("{}", e)))?;

    let tables: Vec<Table> = schema
        .tables()
        .iter()
        .map(|t| {
            let schema_name = schema_or_default(t.ident.schema.as_ref().map(|s| s.to_string.clone()));
            let columns = t
                .cols
                .iter()
                .map(|c| {
                    Column {
                        name: c.name.to_string.clone(),
                        is_pk: c.settings.as_ref().is_some_and(|s| s.is_pk),
                    }
                })
                .collect();

            Table {
                id: TableId::new(schema_name, t.ident.name.to_string.clone()),
                columns,
            }
        })
        .collect();

    let mut relationships: Vec<Relationship> = Vec::new();

    // Standalone refs, e.g. `Ref: posts.user_id > users.id`
    for r in schema.refs() {
        let Some(relation_type) = relation_type(&r.rel) else {
            continue;
        };
        relationships.push(Relationship {
            relation_type,
            from: EndPoint {
                table_id: TableId::new(
                    schema_or_default(r.lhs.schema.as_ref().map(|s| s.to_string.clone())),
                    r.lhs.table.to_string.clone(),
                ),
                column_names: r.lhs.compositions.iter().map(|c| c.to_string.clone()).collect(),
            },
            to: EndPoint {
                table_id: TableId::new(
                    schema_or_default(r.rhs.schema.as_ref().map(|s| s.to_string.clone())),
                    r.rhs.table.to_string.clone(),
                ),
                column_names: r.rhs.compositions.iter().map(|c| c.to_string.clone()).collect(),
            },
        });
    }

    // Inline refs, e.g. `user_id int [ref: > users.id]`
    for t in schema.tables() {
        let table_id = TableId::new(
            schema_or_default(t.ident.schema.as_ref().map(|s| s.to_string.clone())),
            t.ident.name.to_string.clone(),
        );
        for col in &t.cols {
            let Some(settings) = &col.settings else {
                continue;
            };
            for inline_ref in &settings.refs {
                let Some(relation_type) = relation_type(&inline_ref.rel) else {
                    continue;
                };
                relationships.push(Relationship {
                    relation_type,
                    from: EndPoint {
                        table_id: table_id.clone(),
                        column_names: vec![col.name.to_string.clone()],
                    },
                    to: EndPoint {
                        table_id: TableId::new(
                            schema_or_default(
                                inline_ref.rhs.schema.as_ref().map(|s| s.to_string.clone()),
                            ),
                            inline_ref.rhs.table.to_string.clone(),
                        ),
                        column_names: inline_ref
                            .rhs
                            .compositions
                            .iter()
                            .map(|c| c.to_string.clone())
                            .collect(),
                    },
                });
            }
        }
    }

    Ok(Diagram {
        tables,
        relationships,
    })
}

fn schema_or_default(schema: Option<String>) -> String {
    schema.unwrap_or_else(|| DEFAULT_SCHEMA.to_string())
}

fn relation_type(rel: &dbml_rs::ast::Relation) -> Option<RelationType> {
    match rel {
        dbml_rs::ast::Relation::One2One => Some(RelationType::OneToOne),
        dbml_rs::ast::Relation::One2Many => Some(RelationType::OneToMany),
        dbml_rs::ast::Relation::Many2One => Some(RelationType::ManyToOne),
        dbml_rs::ast::Relation::Many2Many => Some(RelationType::ManyToMany),
        dbml_rs::ast::Relation::Undef => None,
    }
}
