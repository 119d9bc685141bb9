//! ASCII PLY reader for the Stanford bunny and similar scans.
//!
//! Only `format ascii 1.0` is understood. The `vertex` element must carry
//! `x`, `y` and `z`; other vertex properties are skipped. Faces come from a
//! `property list ... vertex_indices` and are fan-triangulated. Elements other
//! than `vertex` and `face` are read past.

use std::{collections::HashMap, fmt, path::Path};

use cgmath::{InnerSpace, Vector3, Zero};

use crate::{
    data_structures::model::{MeshData, ModelVertex},
    resources::load_string,
};

#[derive(Debug, Clone, PartialEq)]
pub enum PlyError {
    /// The first line is not `ply`.
    NotPly,
    /// Binary or unknown encodings.
    UnsupportedFormat(String),
    /// Malformed header line.
    Header { line: usize, message: String },
    /// A required vertex property or element is absent.
    Missing(&'static str),
    /// The body ended before all declared elements were read.
    UnexpectedEnd { element: String },
    /// A body row with fewer columns than its element needs.
    Row { line: usize, message: String },
    /// A token in the body is not a number.
    Number { line: usize, token: String },
    /// A face with too few vertices or an index past the vertex list.
    Face { line: usize, message: String },
}

impl fmt::Display for PlyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlyError::NotPly => write!(f, "not a PLY file (missing 'ply' magic)"),
            PlyError::UnsupportedFormat(format) => write!(f, "unsupported PLY format: {}", format),
            PlyError::Header { line, message } => write!(f, "PLY header error on line {}: {}", line, message),
            PlyError::Missing(what) => write!(f, "PLY file has no {}", what),
            PlyError::UnexpectedEnd { element } => {
                write!(f, "PLY file ended while reading element '{}'", element)
            }
            PlyError::Row { line, message } => write!(f, "bad row on line {}: {}", line, message),
            PlyError::Number { line, token } => write!(f, "invalid number '{}' on line {}", token, line),
            PlyError::Face { line, message } => write!(f, "bad face on line {}: {}", line, message),
        }
    }
}

impl std::error::Error for PlyError {}

/// Vertex positions and triangles of a PLY file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlyModel {
    pub vertices: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
}

#[derive(Debug)]
struct Element {
    name: String,
    count: usize,
    properties: Vec<String>,
}

pub fn parse_ply(text: &str) -> Result<PlyModel, PlyError> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));

    match lines.next() {
        Some((_, "ply")) => (),
        _ => return Err(PlyError::NotPly),
    }

    let mut elements: Vec<Element> = Vec::new();
    let mut ascii = false;
    let mut header_closed = false;
    for (line, content) in lines.by_ref() {
        let mut tokens = content.split_whitespace();
        match tokens.next() {
            Some("format") => {
                let format = tokens.collect::<Vec<_>>().join(" ");
                if format != "ascii 1.0" {
                    return Err(PlyError::UnsupportedFormat(format));
                }
                ascii = true;
            }
            Some("element") => {
                let (Some(name), Some(count)) = (tokens.next(), tokens.next()) else {
                    return Err(header_error(line, "element needs a name and a count"));
                };
                let count = count
                    .parse()
                    .map_err(|_| header_error(line, &format!("bad element count '{}'", count)))?;
                elements.push(Element {
                    name: name.to_string(),
                    count,
                    properties: Vec::new(),
                });
            }
            Some("property") => {
                let Some(element) = elements.last_mut() else {
                    return Err(header_error(line, "property before any element"));
                };
                let Some(name) = tokens.last() else {
                    return Err(header_error(line, "property without a name"));
                };
                element.properties.push(name.to_string());
            }
            Some("end_header") => {
                header_closed = true;
                break;
            }
            Some("comment") | Some("obj_info") | None => (),
            Some(other) => return Err(header_error(line, &format!("unknown keyword '{}'", other))),
        }
    }
    if !header_closed {
        return Err(PlyError::Missing("end_header"));
    }
    if !ascii {
        return Err(PlyError::Missing("format line"));
    }

    let vertex_element = elements
        .iter()
        .find(|e| e.name == "vertex")
        .ok_or(PlyError::Missing("vertex element"))?;
    let column: HashMap<&str, usize> = vertex_element
        .properties
        .iter()
        .enumerate()
        .map(|(i, p)| (p.as_str(), i))
        .collect();
    let xyz = [
        *column.get("x").ok_or(PlyError::Missing("x property"))?,
        *column.get("y").ok_or(PlyError::Missing("y property"))?,
        *column.get("z").ok_or(PlyError::Missing("z property"))?,
    ];

    let mut body = lines.filter(|(_, l)| !l.is_empty());
    let mut model = PlyModel::default();
    for element in &elements {
        for _ in 0..element.count {
            let (line, content) = body.next().ok_or_else(|| PlyError::UnexpectedEnd {
                element: element.name.clone(),
            })?;
            match element.name.as_str() {
                "vertex" => {
                    let values = content
                        .split_whitespace()
                        .map(|t| parse_number::<f32>(line, t))
                        .collect::<Result<Vec<_>, _>>()?;
                    let [x, y, z] = xyz.map(|i| values.get(i).copied());
                    let (Some(x), Some(y), Some(z)) = (x, y, z) else {
                        return Err(PlyError::Row {
                            line,
                            message: format!(
                                "{} columns, vertex has {} properties",
                                values.len(),
                                element.properties.len()
                            ),
                        });
                    };
                    model.vertices.push([x, y, z]);
                }
                "face" => {
                    let indices = face_list(line, content)?;
                    push_face(&mut model.faces, line, &indices, vertex_element.count)?;
                }
                _ => (),
            }
        }
    }
    Ok(model)
}

fn header_error(line: usize, message: &str) -> PlyError {
    PlyError::Header {
        line,
        message: message.to_string(),
    }
}

fn parse_number<T: std::str::FromStr>(line: usize, token: &str) -> Result<T, PlyError> {
    token.parse().map_err(|_| PlyError::Number {
        line,
        token: token.to_string(),
    })
}

/// The leading `n i0 .. i(n-1)` list of a face row. Trailing properties are
/// left unparsed.
fn face_list(line: usize, content: &str) -> Result<Vec<u32>, PlyError> {
    let mut tokens = content.split_whitespace();
    let Some(count) = tokens.next() else {
        return Ok(Vec::new());
    };
    let n = parse_number::<u32>(line, count)?;
    std::iter::once(Ok(n))
        .chain(tokens.take(n as usize).map(|t| parse_number::<u32>(line, t)))
        .collect()
}

/// `[n, i0, i1, ..]` as a triangle fan around `i0`.
fn push_face(
    faces: &mut Vec<[u32; 3]>,
    line: usize,
    list: &[u32],
    vertex_count: usize,
) -> Result<(), PlyError> {
    let Some((&n, indices)) = list.split_first() else {
        return Err(PlyError::Face {
            line,
            message: "empty face".to_string(),
        });
    };
    if n < 3 || indices.len() < n as usize {
        return Err(PlyError::Face {
            line,
            message: format!("declares {} vertices, has {}", n, indices.len()),
        });
    }
    let indices = &indices[..n as usize];
    if let Some(bad) = indices.iter().find(|i| **i as usize >= vertex_count) {
        return Err(PlyError::Face {
            line,
            message: format!("index {} with only {} vertices", bad, vertex_count),
        });
    }
    for i in 1..indices.len() - 1 {
        faces.push([indices[0], indices[i], indices[i + 1]]);
    }
    Ok(())
}

/// Expand to three vertices per triangle with smooth normals.
///
/// Each triangle gets the flat normal `normalize(c - a) × normalize(b - a)`;
/// every output vertex then takes the average of the flat normals of all
/// triangles that share its source vertex.
pub fn bunny_mesh(ply: &PlyModel) -> MeshData {
    let mut shared = vec![Vector3::zero(); ply.vertices.len()];
    let mut flat = Vec::with_capacity(ply.faces.len());
    for face in &ply.faces {
        let [a, b, c] = face.map(|i| Vector3::from(ply.vertices[i as usize]));
        let normal = (c - a).normalize().cross((b - a).normalize());
        // zero-length edges
        let normal = if normal.magnitude2().is_finite() {
            normal
        } else {
            Vector3::zero()
        };
        flat.push(normal);
        for i in face {
            shared[*i as usize] += normal;
        }
    }

    let vertices = ply
        .faces
        .iter()
        .zip(flat)
        .flat_map(|(face, flat_normal)| {
            let shared = &shared;
            let vertices = &ply.vertices;
            face.iter().map(move |i| {
                let sum = shared[*i as usize];
                let normal = if sum.magnitude2() > f32::EPSILON {
                    sum.normalize()
                } else {
                    flat_normal
                };
                ModelVertex::new(vertices[*i as usize], normal.into())
            })
        })
        .collect();
    MeshData::from_triangles(vertices)
}

pub async fn load_ply(root: &Path, file_name: &str) -> anyhow::Result<PlyModel> {
    let text = load_string(root, file_name).await?;
    let model = parse_ply(&text).map_err(|e| anyhow::anyhow!("{}: {}", file_name, e))?;
    log::info!(
        "loaded {}: {} vertices, {} triangles",
        file_name,
        model.vertices.len(),
        model.faces.len()
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "\
ply
format ascii 1.0
comment two triangles folded along the diagonal
element vertex 4
property float x
property float y
property float z
property float confidence
property float intensity
element face 1
property list uchar int vertex_indices
end_header
0 0 0 1 0.5
1 0 0 1 0.5
1 1 0 1 0.5
0 1 0 1 0.5
4 0 1 2 3
";

    #[test]
    fn reads_positions_and_fans_polygons() {
        let model = parse_ply(SQUARE).unwrap();
        assert_eq!(model.vertices.len(), 4);
        assert_eq!(model.vertices[2], [1.0, 1.0, 0.0]);
        assert_eq!(model.faces, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn property_order_is_respected() {
        let text = "ply\nformat ascii 1.0\nelement vertex 1\nproperty float z\nproperty float x\nproperty float y\nelement face 0\nproperty list uchar int vertex_indices\nend_header\n3 1 2\n";
        let model = parse_ply(text).unwrap();
        assert_eq!(model.vertices, vec![[1.0, 2.0, 3.0]]);
    }

    #[test]
    fn rejects_other_formats() {
        assert_eq!(parse_ply("OFF\n"), Err(PlyError::NotPly));
        let binary = SQUARE.replace("ascii 1.0", "binary_little_endian 1.0");
        assert!(matches!(parse_ply(&binary), Err(PlyError::UnsupportedFormat(_))));
    }

    #[test]
    fn reports_truncated_bodies() {
        let truncated = SQUARE.trim_end().rsplit_once('\n').unwrap().0;
        assert_eq!(
            parse_ply(truncated),
            Err(PlyError::UnexpectedEnd {
                element: "face".to_string()
            })
        );
    }

    #[test]
    fn reports_bad_numbers_and_indices() {
        let bad_number = SQUARE.replace("1 1 0 1 0.5", "1 one 0 1 0.5");
        assert_eq!(
            parse_ply(&bad_number),
            Err(PlyError::Number {
                line: 15,
                token: "one".to_string()
            })
        );
        let bad_index = SQUARE.replace("4 0 1 2 3", "3 0 1 9");
        assert!(matches!(parse_ply(&bad_index), Err(PlyError::Face { .. })));
        let degenerate = SQUARE.replace("4 0 1 2 3", "2 0 1");
        assert!(matches!(parse_ply(&degenerate), Err(PlyError::Face { .. })));
    }

    #[test]
    fn short_vertex_rows_report_their_line() {
        let short = SQUARE.replace("1 1 0 1 0.5", "1 1");
        assert_eq!(
            parse_ply(&short),
            Err(PlyError::Row {
                line: 15,
                message: "2 columns, vertex has 5 properties".to_string()
            })
        );
    }

    #[test]
    fn face_properties_after_the_index_list_are_ignored() {
        let text = "\
ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
property float quality
end_header
0 0 0
1 0 0
0 1 0
3 0 1 2 0.5
";
        let model = parse_ply(text).unwrap();
        assert_eq!(model.faces, vec![[0, 1, 2]]);
        let short = text.replace("3 0 1 2 0.5", "3 0 1");
        assert!(matches!(parse_ply(&short), Err(PlyError::Face { line: 14, .. })));
    }

    #[test]
    fn bunny_mesh_expands_faces() {
        let mesh = bunny_mesh(&parse_ply(SQUARE).unwrap());
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices, (0..6).collect::<Vec<u32>>());
    }

    #[test]
    fn shared_vertices_get_averaged_normals() {
        // a roof: two triangles meeting at the ridge x = 0
        let roof = PlyModel {
            vertices: vec![[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            faces: vec![[0, 2, 1], [0, 1, 3]],
        };
        let mesh = bunny_mesh(&roof);
        let ridge = mesh.vertices[0].normal;
        // the two slopes cancel in x, leaving a vertical normal on the ridge
        assert!(ridge[0].abs() < 1e-5);
        assert!((ridge[1].abs() - 1.0).abs() < 1e-5);
        // the eaves belong to one face only and keep its tilt
        let eave = mesh.vertices[1].normal;
        assert!(eave[0].abs() > 0.5);
    }
}
