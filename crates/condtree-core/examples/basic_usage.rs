//! Basic usage example for condtree-core
//!
//! Run with: cargo run --example basic_usage

use condtree_core::{ComparisonOperator, EmbeddedOperator, LogicalOperator, Transformer};
use serde_json::json;

fn main() -> condtree_core::Result<()> {
    println!("=== condtree Core Basic Usage Example ===\n");

    // Example 1: Serializing a condition object
    println!("1. Serializing a condition object:");
    let query = json!({
        "age": { "$gte": 18 },
        "feedback": { "store": { "id": { "$eq": 7 } } },
        "$or": [
            { "country": { "$in": ["US", "CA"] } },
            { "tags": { "$some": { "name": { "$eq": "vip" } } } }
        ]
    });
    let mut transformer = Transformer::from_query(&query);
    println!("   Tree: {}\n", serde_json::to_string_pretty(transformer.tree())?);

    // Example 2: Editing the tree
    println!("2. Editing the tree:");
    let or_id = transformer
        .tree()
        .iter()
        .find(|node| node.node_type() == condtree_core::NodeType::Logical)
        .map(|node| node.id())
        .unwrap_or_default();
    let cond_id = transformer.add_condition_node(
        vec!["feedback".to_string(), "store".to_string(), "name".to_string()],
        ComparisonOperator::Ilike,
        "%coffee%",
        None,
    )?;
    let not_id = transformer.add_logical_node(LogicalOperator::Not, Some(or_id))?;
    let items_id = transformer.add_embedded_node(
        vec!["items".to_string()],
        EmbeddedOperator::Every,
        Some(not_id),
    )?;
    transformer.add_condition_node(
        vec!["qty".to_string()],
        ComparisonOperator::Gt,
        0i64,
        Some(items_id),
    )?;
    transformer.update_condition_node(cond_id, ComparisonOperator::Ne, "closed")?;
    println!("   Added nodes {}, {}, {}\n", cond_id, not_id, items_id);

    // Example 3: Deserializing back
    println!("3. Deserializing back:");
    println!("   Query: {}\n", transformer.to_json_string()?);

    // Example 4: Removing a subtree
    println!("4. Removing the $or subtree:");
    transformer.remove(or_id);
    println!("   Query: {}\n", transformer.to_json_string()?);

    // Example 5: Error handling
    println!("5. Error handling:");
    match transformer.add_logical_node(LogicalOperator::And, Some(cond_id)) {
        Ok(_) => println!("   Unexpected success"),
        Err(e) => println!("   {}", e),
    }

    println!("\n=== Example completed successfully ===");
    Ok(())
}
