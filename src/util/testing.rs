//! Test support: logging setup and sample SMART packages

use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let noisy_modules = ["zip", "quick_xml"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::ENTER)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// A small but complete Configurable Model.
///
/// - Spanish is the flagged default language
/// - "Animals" groups "Deer" (with a child "Red Deer") and "Boar"
/// - attributes cover every type, `count` is shared by two nodes
/// - `habitat` (LIST) and `sign` (TREE) are configured, `weather` (LIST) is not
pub const SAMPLE_MODEL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<cm:ConfigurableModel xmlns:cm="http://www.smartconservationsoftware.org/xml/1.0/configurablemodel">
  <cm:languages>
    <cm:language code="en"/>
    <cm:language code="es" is_default="true"/>
  </cm:languages>
  <cm:nodes>
    <cm:node id="n1" categoryHkey="animals.">
      <cm:name language_code="en" value="Animals"/>
      <cm:name language_code="es" value="Animales"/>
      <cm:node id="n2" dmUuid="dm-2" configId="cfg-1" categoryKey="deer" categoryHkey="animals.deer." imageFile="icons\deer.svg">
        <cm:name language_code="en" value="Deer"/>
        <cm:name language_code="es" value="Ciervo"/>
        <cm:attribute attributeKey="count" type="NUMERIC" minValue="0" maxValue="">
          <cm:name language_code="en" value="Count"/>
          <cm:name language_code="es" value="Cantidad"/>
        </cm:attribute>
        <cm:attribute attributeKey="habitat" type="LIST">
          <cm:name language_code="es" value="Hábitat"/>
        </cm:attribute>
        <cm:attribute attributeKey="sign" type="TREE">
          <cm:name language_code="es" value="Rastro"/>
        </cm:attribute>
        <cm:node id="n3" categoryKey="reddeer" categoryHkey="Animals.Deer.RedDeer.">
          <cm:name language_code="es" value="Ciervo rojo"/>
          <cm:attribute attributeKey="count" type="TEXT">
            <cm:name language_code="es" value="Número"/>
          </cm:attribute>
          <cm:attribute attributeKey="alive" type="BOOLEAN">
            <cm:name language_code="es" value="Vivo"/>
          </cm:attribute>
        </cm:node>
      </cm:node>
      <cm:node id="n4" categoryKey="boar" categoryHkey="animals.boar." imageFile="boar.svg">
        <cm:name language_code="es" value="Jabalí"/>
        <cm:attribute attributeKey="weather" type="LIST">
          <cm:name language_code="es" value="Clima"/>
        </cm:attribute>
        <cm:attribute attributeKey="notes" type="GEOMETRY">
          <cm:name language_code="es" value="Notas"/>
        </cm:attribute>
      </cm:node>
    </cm:node>
  </cm:nodes>
  <cm:attributeConfig attributeKey="habitat">
    <cm:listItem keyRef="forest"><cm:name language_code="es" value="Bosque"/></cm:listItem>
    <cm:listItem keyRef="river"><cm:name language_code="es" value="Río"/></cm:listItem>
  </cm:attributeConfig>
  <cm:attributeConfig attributeKey="sign">
    <cm:treeNode keyRef="tracks">
      <cm:name language_code="es" value="Huellas"/>
      <cm:treeNode keyRef="tracks.fresh"><cm:name language_code="es" value="Frescas"/></cm:treeNode>
      <cm:treeNode keyRef="tracks.old"><cm:name language_code="es" value="Viejas"/></cm:treeNode>
    </cm:treeNode>
    <cm:treeNode keyRef="dung"><cm:name language_code="es" value="Excremento"/></cm:treeNode>
  </cm:attributeConfig>
</cm:ConfigurableModel>
"#;

/// Minimal SVG body for icon fixtures.
pub const SAMPLE_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#;

/// Write a zip archive with the given `(entry name, content)` pairs.
pub fn write_zip(path: &Path, entries: &[(&str, &str)]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        zip.start_file(*name, options).map_err(io::Error::other)?;
        zip.write_all(content.as_bytes())?;
    }
    zip.finish().map_err(io::Error::other)?;
    Ok(())
}

/// Write a complete sample package (model plus both icons) as a zip.
pub fn write_sample_package(path: &Path) -> io::Result<()> {
    write_zip(
        path,
        &[
            ("cm_model.xml", SAMPLE_MODEL),
            ("icons/deer.svg", SAMPLE_ICON),
            ("boar.svg", SAMPLE_ICON),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }
}
