//! GPX export
//!
//! Renders a normalized track into a pretty-printed GPX 1.1 document and
//! writes it under the output directory, creating directories as needed.

use crate::error::Result;
use crate::normalize::format_utc_second;
use crate::types::Track;
use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Creator attribute stamped on every output document
pub const GPX_CREATOR: &str = "track_converter";

/// Render a track and write it into `output_dir`.
///
/// The file name follows the timestamp-prefix policy (see
/// [`output_file_name`]). Returns the full path of the written file.
pub fn export_track(track: &Track, output_dir: &Path) -> Result<PathBuf> {
    let out_path = output_dir.join(output_file_name(track));
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = BufWriter::new(File::create(&out_path)?);
    write_gpx(&mut file, track, Utc::now())?;
    file.flush()?;

    Ok(out_path)
}

/// Output file name for a track: the source file's stem with a `.gpx`
/// extension, prefixed with the first-point timestamp when one was captured.
pub fn output_file_name(track: &Track) -> String {
    let base = Path::new(&track.source_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&track.source_name);

    match track.start_time {
        Some(ts) => format!("{}_{}.gpx", ts.format("%Y-%m-%d-%H-%M-%S"), base),
        None => format!("{}.gpx", base),
    }
}

/// Write a complete GPX document for the track.
///
/// `generated_at` becomes the metadata `time` element; callers pass the
/// current instant, tests pass a fixed one.
pub fn write_gpx<W: Write>(w: &mut W, track: &Track, generated_at: DateTime<Utc>) -> Result<()> {
    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(w, r#"<gpx version="1.1" creator="{}">"#, GPX_CREATOR)?;
    writeln!(w, "  <metadata>")?;
    writeln!(w, "    <time>{}</time>", format_utc_second(generated_at))?;
    writeln!(w, "  </metadata>")?;
    writeln!(w, "  <trk>")?;
    writeln!(w, "    <name>{}</name>", xml_escape(&track.source_name))?;
    writeln!(w, "    <type>{}</type>", xml_escape(&track.activity_type))?;
    writeln!(w, "    <trkseg>")?;

    for point in &track.points {
        write!(
            w,
            r#"      <trkpt lat="{:.6}" lon="{:.6}">"#,
            point.latitude, point.longitude
        )?;

        if point.elevation.is_none() && point.time.is_none() {
            writeln!(w, "</trkpt>")?;
            continue;
        }

        writeln!(w)?;
        if let Some(ele) = point.elevation {
            writeln!(w, "        <ele>{:.1}</ele>", ele)?;
        }
        if let Some(time) = &point.time {
            writeln!(w, "        <time>{}</time>", xml_escape(&time.text))?;
        }
        writeln!(w, "      </trkpt>")?;
    }

    writeln!(w, "    </trkseg>")?;
    writeln!(w, "  </trk>")?;
    writeln!(w, "</gpx>")?;

    Ok(())
}

/// Render a track to an in-memory GPX document
pub fn render_gpx(track: &Track, generated_at: DateTime<Utc>) -> Result<String> {
    let mut buf = Vec::new();
    write_gpx(&mut buf, track, generated_at)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(xml_escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(xml_escape("plain.fit"), "plain.fit");
    }
}
