//! Subcommand implementations, decoupled from the HTTP client via
//! [`NotionAdmin`] so they can be driven by a test double.
use anyhow::Result;
use tracing::warn;

use crate::config::Settings;
use crate::notion::model::DatabaseObject;
use crate::notion::NotionAdmin;
use crate::schema::{resolve_properties_arg, PropertySchema};

/// Create a database under the configured parent page, then print its
/// resolved property schema.
pub async fn create(
    notion: &dyn NotionAdmin,
    settings: &Settings,
    title: &str,
    properties_arg: &str,
) -> Result<()> {
    let raw = resolve_properties_arg(properties_arg)?;
    let schema = PropertySchema::from_json(&raw)?;
    if schema.is_empty() {
        warn!("no usable columns in properties, creating a database with an empty schema");
    }

    let db = notion
        .create_database(&settings.parent_page_id, title, &schema)
        .await?;
    println!("Created database '{}' (id: {})", title, db.id);

    // Echo the schema as Notion resolved it, matching what a follow-up
    // inspect would show.
    let created = notion.retrieve_database(&db.id).await?;
    print_properties(&created);
    Ok(())
}

/// Archive a database. Notion does not support hard deletion.
pub async fn delete(notion: &dyn NotionAdmin, database_id: &str) -> Result<()> {
    notion.archive_database(database_id).await?;
    println!("Archived database {}", database_id);
    Ok(())
}

/// Archive every page in a database.
pub async fn clear(notion: &dyn NotionAdmin, database_id: &str) -> Result<()> {
    let archived = notion.clear_database(database_id).await?;
    println!("Archived {} pages in database {}", archived, database_id);
    Ok(())
}

/// Print a database's title and property schema.
pub async fn inspect(notion: &dyn NotionAdmin, database_id: &str) -> Result<()> {
    let db = notion.retrieve_database(database_id).await?;
    println!("Database: {} (id: {})", db.plain_title(), db.id);
    print_properties(&db);
    Ok(())
}

/// List databases visible to the integration.
pub async fn search(notion: &dyn NotionAdmin) -> Result<()> {
    let databases = notion.search_databases().await?;
    if databases.is_empty() {
        println!("No databases visible to this integration.");
        return Ok(());
    }
    for db in databases {
        println!("{}  {}", db.id, db.plain_title());
    }
    Ok(())
}

fn print_properties(db: &DatabaseObject) {
    println!("Properties:");
    let mut names: Vec<_> = db.properties.keys().collect();
    names.sort();
    for name in names {
        let prop = &db.properties[name];
        println!("  {} -> {{ id: {}, type: {} }}", name, prop.id, prop.typ);
    }
}
