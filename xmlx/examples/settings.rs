//! Example: Read typed settings from an XML file
//!
//! This example demonstrates the typed accessors and traversal helpers on a
//! small settings document. Without an argument it reads a built-in sample.
//!
//! Usage: RUST_LOG=xmlx=debug cargo run --example settings [settings.xml]

use std::env;
use std::ops::ControlFlow;

use tracing_subscriber::EnvFilter;
use xmlx::{
    create_text_element, for_each_sub_element, get_bool_attribute, get_float_sub_element,
    get_hex_attribute, get_int_attribute, get_string_attribute, get_string_sub_element,
    get_uint_sub_element, sub_element, Document,
};

const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<settings version="3">
  <window fullscreen="false" background="0x203040">
    <title>Editor</title>
    <width>1280</width>
    <height>800</height>
    <scale>1.25</scale>
  </window>
  <plugins>
    <plugin name="spell" enabled="true"/>
    <plugin name="lint" enabled="0"/>
    <plugin name="broken" enabled="maybe"/>
  </plugins>
</settings>"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let doc = match args.get(1) {
        Some(path) => {
            eprintln!("Parsing settings: {}", path);
            Document::parse_file(path)?
        }
        None => Document::parse_str(SAMPLE)?,
    };

    let settings = doc
        .document_element()
        .ok_or("settings document has no root element")?;
    println!("version: {}", get_int_attribute(&settings, "version", 1));

    if let Some(window) = sub_element(&settings, "window") {
        println!("title: {}", get_string_sub_element(&window, "title", "Untitled"));
        println!(
            "size: {}x{}",
            get_uint_sub_element(&window, "width", 640),
            get_uint_sub_element(&window, "height", 480)
        );
        println!("scale: {}", get_float_sub_element(&window, "scale", 1.0));
        println!("fullscreen: {}", get_bool_attribute(&window, "fullscreen", false));
        println!("background: #{:06X}", get_hex_attribute(&window, "background", 0));
    }

    if let Some(plugins) = sub_element(&settings, "plugins") {
        // Lists enabled plugins, stopping at the first one that is misconfigured.
        let completed = for_each_sub_element(&plugins.as_node(), |plugin| {
            let name = get_string_attribute(&plugin, "name", "?");
            match plugin.attribute("enabled") {
                Some(_) if get_bool_attribute(&plugin, "enabled", false) => {
                    println!("plugin enabled: {}", name);
                    ControlFlow::Continue(())
                }
                Some(value) if value.coerce::<bool>().is_err() => {
                    eprintln!("plugin {} has an invalid 'enabled' value: {}", name, value);
                    ControlFlow::Break(())
                }
                _ => ControlFlow::Continue(()),
            }
        });
        if !completed {
            eprintln!("plugin scan stopped early");
        }
    }

    let note = create_text_element(&doc, "note", "generated by the settings example")?;
    settings.append_child(&note.as_node())?;
    println!("{}", xmlx::print_to_string_pretty(doc.as_node().node_ref())?);

    Ok(())
}
