//! List the built-in host templates.

use anyhow::Result;
use stitchwork_core::BUILTIN_TEMPLATES;

pub fn list_templates(json: bool) -> Result<()> {
    if json {
        let entries: Vec<_> = BUILTIN_TEMPLATES
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "extension": t.extension,
                    "description": t.description,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for template in BUILTIN_TEMPLATES {
        println!("{:<10} .{:<6} {}", template.name, template.extension, template.description);
    }
    Ok(())
}
