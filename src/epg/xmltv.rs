//! XMLTV output: rendering a `Document` and writing it to disk

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::model::{Channel, Document, Programme};
use crate::error::{GuideError, Result};

const GENERATOR_NAME: &str = "jsontv";
const LANG: &str = "en";

/// Render the document as an XMLTV string
pub fn render(doc: &Document) -> String {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    // Writing into a Vec cannot fail
    if let Err(e) = write_document(&mut writer, doc) {
        log::error!("XMLTV rendering failed: {}", e);
    }
    String::from_utf8_lossy(&writer.into_inner()).into_owned()
}

fn write_document<W: io::Write>(writer: &mut Writer<W>, doc: &Document) -> io::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), Some("yes"))))?;
    writer.write_event(Event::Start(
        BytesStart::new("tv").with_attributes([("generator-info-name", GENERATOR_NAME)]),
    ))?;

    for channel in doc.channels() {
        write_channel(writer, channel)?;
    }
    for programme in doc.programmes() {
        write_programme(writer, programme)?;
    }

    writer.write_event(Event::End(BytesEnd::new("tv")))?;
    Ok(())
}

fn write_channel<W: io::Write>(writer: &mut Writer<W>, channel: &Channel) -> io::Result<()> {
    writer.write_event(Event::Start(
        BytesStart::new("channel").with_attributes([("id", channel.id.as_str())]),
    ))?;
    write_text_element(writer, "display-name", None, &channel.display_name)?;
    if let Some(icon) = &channel.icon {
        writer.write_event(Event::Empty(
            BytesStart::new("icon").with_attributes([("src", icon.as_str())]),
        ))?;
    }
    writer.write_event(Event::End(BytesEnd::new("channel")))
}

fn write_programme<W: io::Write>(writer: &mut Writer<W>, programme: &Programme) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("programme").with_attributes([
        ("start", programme.start.as_str()),
        ("stop", programme.stop.as_str()),
        ("channel", programme.channel_id.as_str()),
    ])))?;
    write_text_element(writer, "title", Some(LANG), &programme.title)?;
    if let Some(desc) = &programme.description {
        write_text_element(writer, "desc", Some(LANG), desc)?;
    }
    writer.write_event(Event::End(BytesEnd::new("programme")))
}

fn write_text_element<W: io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    lang: Option<&str>,
    text: &str,
) -> io::Result<()> {
    let mut start = BytesStart::new(name);
    if let Some(lang) = lang {
        start.push_attribute(("lang", lang));
    }
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))
}

/// Write the rendered guide, creating parent directories. The file is written
/// next to the target first and renamed into place.
pub fn write_guide(path: &Path, xml: &str) -> Result<()> {
    let persistence = |source: io::Error| GuideError::Persistence {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(persistence)?;
    }

    let mut tmp = PathBuf::from(path);
    tmp.set_extension("xml.tmp");
    fs::write(&tmp, xml).map_err(persistence)?;
    fs::rename(&tmp, path).map_err(|e| {
        fs::remove_file(&tmp).ok();
        persistence(e)
    })?;

    log::info!("Wrote guide to {}", path.display());
    Ok(())
}

#[cfg(test)]
#[path = "xmltv_tests.rs"]
mod tests;
