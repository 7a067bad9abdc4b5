//! STL serialization, binary and ASCII.
//!
//! Binary layout is the de facto standard: 80-byte non-semantic header,
//! u32 little-endian triangle count, then 50 bytes per triangle (normal,
//! three vertices as f32 little-endian, u16 attribute count of zero).
//! The ASCII variant is the human-readable `facet normal`/`outer loop`
//! block format, useful for diffable artifacts. A reader for both is
//! provided so round-trips can be verified.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{MapError, Result};
use crate::mesh::{Mesh, Triangle, Vec3};

const HEADER_LEN: usize = 80;
const TRIANGLE_LEN: usize = 50;

/// Output encoding for STL files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Binary,
    Ascii,
}

impl Encoding {
    /// Parse an encoding name; anything other than binary/ascii is refused.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "binary" => Ok(Encoding::Binary),
            "ascii" | "text" => Ok(Encoding::Ascii),
            other => Err(MapError::UnsupportedEncoding(other.to_string())),
        }
    }
}

/// Write a mesh to `path` in the given encoding, forcing an `.stl`
/// extension. Returns the path actually written.
pub fn write_stl(mesh: &Mesh, path: &Path, encoding: Encoding) -> Result<PathBuf> {
    let path = path.with_extension("stl");
    match encoding {
        Encoding::Binary => write_binary(mesh, &path)?,
        Encoding::Ascii => write_ascii(mesh, &path)?,
    }
    Ok(path)
}

fn write_binary(mesh: &Mesh, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let mut header = [0u8; HEADER_LEN];
    let tag = b"reliefcast binary stl";
    header[..tag.len()].copy_from_slice(tag);
    writer.write_all(&header)?;
    writer.write_all(&(mesh.len() as u32).to_le_bytes())?;

    for triangle in mesh.iter() {
        let normal = triangle.normal();
        for v in [normal, triangle.a, triangle.b, triangle.c] {
            writer.write_all(&(v.x as f32).to_le_bytes())?;
            writer.write_all(&(v.y as f32).to_le_bytes())?;
            writer.write_all(&(v.z as f32).to_le_bytes())?;
        }
        writer.write_all(&[0u8, 0u8])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_ascii(mesh: &Mesh, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "solid reliefcast")?;
    for triangle in mesh.iter() {
        let n = triangle.normal();
        writeln!(writer, "  facet normal {} {} {}", n.x as f32, n.y as f32, n.z as f32)?;
        writeln!(writer, "    outer loop")?;
        for v in [triangle.a, triangle.b, triangle.c] {
            writeln!(writer, "      vertex {} {} {}", v.x as f32, v.y as f32, v.z as f32)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid reliefcast")?;

    writer.flush()?;
    Ok(())
}

/// Read a mesh back from an STL file, auto-detecting the encoding.
pub fn read_stl(path: &Path) -> Result<Mesh> {
    let mut file = File::open(path)?;
    let mut header = [0u8; HEADER_LEN];
    let read = file.read(&mut header)?;

    // ASCII files start with "solid"; binary headers usually carry null
    // bytes, so require a fully printable header as well.
    let looks_ascii = read >= 5
        && header[..read].starts_with(b"solid")
        && header[..read].iter().all(|&b| b == b'\n' || b == b'\r' || b == b'\t' || (32..127).contains(&b));

    let file = File::open(path)?;
    if looks_ascii {
        read_ascii(BufReader::new(file))
    } else {
        read_binary(BufReader::new(file))
    }
}

fn read_binary<R: Read>(mut reader: R) -> Result<Mesh> {
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header)?;

    let mut count_bytes = [0u8; 4];
    reader.read_exact(&mut count_bytes)?;
    let count = u32::from_le_bytes(count_bytes) as usize;

    let mut mesh = Mesh::with_capacity(count);
    let mut record = [0u8; TRIANGLE_LEN];
    for _ in 0..count {
        reader.read_exact(&mut record)?;
        // Normal at bytes 0..12 is ignored; winding is authoritative.
        let a = read_vertex(&record[12..24]);
        let b = read_vertex(&record[24..36]);
        let c = read_vertex(&record[36..48]);
        mesh.push(Triangle::new(a, b, c));
    }
    Ok(mesh)
}

fn read_vertex(data: &[u8]) -> Vec3 {
    let f = |i: usize| f32::from_le_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]) as f64;
    Vec3::new(f(0), f(4), f(8))
}

fn read_ascii<R: BufRead>(reader: R) -> Result<Mesh> {
    let mut mesh = Mesh::new();
    let mut vertices: Vec<Vec3> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.starts_with("vertex") {
            let mut parts = line.split_whitespace().skip(1);
            let mut coord = || -> Result<f64> {
                parts
                    .next()
                    .and_then(|p| p.parse().ok())
                    .ok_or_else(|| MapError::MalformedStl("bad vertex line".into()))
            };
            vertices.push(Vec3::new(coord()?, coord()?, coord()?));
        } else if line.starts_with("endfacet") {
            if vertices.len() != 3 {
                return Err(MapError::MalformedStl("facet without 3 vertices".into()));
            }
            mesh.push(Triangle::new(vertices[0], vertices[1], vertices[2]));
            vertices.clear();
        }
    }

    Ok(mesh)
}
