use std::path::Path;

use super::error::AssetError;

/// One expanded triangle corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Consecutive faces drawn with the same `usemtl` material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceGroup {
    pub material: Option<String>,
    /// Three vertices per triangle, no sharing.
    pub vertices: Vec<MeshVertex>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshDescription {
    pub material_libraries: Vec<String>,
    pub groups: Vec<FaceGroup>,
}

impl MeshDescription {
    pub fn vertex_count(&self) -> usize {
        self.groups.iter().map(|group| group.vertices.len()).sum()
    }
}

#[derive(Clone, Copy)]
struct Corner {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

/// Parse a Wavefront OBJ mesh into a flat per-face-vertex stream.
///
/// Attribute tables start with a dummy element so 1-based indices address them
/// directly. Negative indices count back from the newest element. Polygons are
/// fan-triangulated and faces without normals get their flat face normal.
pub fn parse_mesh(text: &str, path: &Path) -> Result<MeshDescription, AssetError> {
    let mut positions: Vec<[f32; 3]> = vec![[0.0; 3]];
    let mut normals: Vec<[f32; 3]> = vec![[0.0; 3]];
    let mut uvs: Vec<[f32; 2]> = vec![[0.0; 2]];

    let mut mesh = MeshDescription::default();
    let mut current = FaceGroup::default();

    for (number, raw) in text.lines().enumerate() {
        let line_no = number + 1;
        let line = raw.split('#').next().unwrap_or_default().trim();
        let mut fields = line.split_whitespace();
        let Some(keyword) = fields.next() else {
            continue;
        };

        match keyword {
            "v" => positions.push(parse_floats::<3>(fields, path, line_no)?),
            "vn" => normals.push(parse_floats::<3>(fields, path, line_no)?),
            "vt" => {
                // Optional third texture coordinate is ignored.
                let mut uv = [0.0; 2];
                for (slot, value) in uv.iter_mut().zip(fields) {
                    *slot = parse_float(value, path, line_no)?;
                }
                uvs.push(uv);
            }
            "f" => {
                let corners = fields
                    .map(|token| {
                        parse_corner(
                            token,
                            [positions.len(), uvs.len(), normals.len()],
                            path,
                            line_no,
                        )
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err(AssetError::malformed(
                        path,
                        line_no,
                        "face needs at least three vertices",
                    ));
                }
                for i in 1..corners.len() - 1 {
                    let triangle = [corners[0], corners[i], corners[i + 1]];
                    emit_triangle(&mut current, triangle, &positions, &normals, &uvs);
                }
            }
            "usemtl" => {
                let name = fields.next().map(str::to_string);
                if !current.vertices.is_empty() {
                    mesh.groups.push(std::mem::take(&mut current));
                }
                current.material = name;
            }
            "mtllib" => mesh.material_libraries.extend(fields.map(str::to_string)),
            // Groups, objects and smoothing flags carry nothing we draw.
            _ => {}
        }
    }

    if !current.vertices.is_empty() {
        mesh.groups.push(current);
    }
    Ok(mesh)
}

fn parse_float(token: &str, path: &Path, line: usize) -> Result<f32, AssetError> {
    token
        .parse::<f32>()
        .map_err(|_| AssetError::malformed(path, line, format!("invalid number `{token}`")))
}

fn parse_floats<'a, const N: usize>(
    mut fields: impl Iterator<Item = &'a str>,
    path: &Path,
    line: usize,
) -> Result<[f32; N], AssetError> {
    let mut out = [0.0; N];
    for slot in out.iter_mut() {
        let token = fields
            .next()
            .ok_or_else(|| AssetError::malformed(path, line, format!("expected {N} values")))?;
        *slot = parse_float(token, path, line)?;
    }
    Ok(out)
}

/// Resolve a raw OBJ index against a table of `len` entries (dummy included).
fn resolve_index(raw: &str, len: usize, path: &Path, line: usize) -> Result<usize, AssetError> {
    let value: i64 = raw
        .parse()
        .map_err(|_| AssetError::malformed(path, line, format!("invalid index `{raw}`")))?;
    let resolved = match value {
        0 => None,
        v if v > 0 => Some(v as usize),
        v => (len as i64 + v).try_into().ok().filter(|&i: &usize| i > 0),
    };
    resolved
        .filter(|&index| index < len)
        .ok_or_else(|| AssetError::malformed(path, line, format!("index {raw} out of range")))
}

fn parse_corner(
    token: &str,
    [positions, uvs, normals]: [usize; 3],
    path: &Path,
    line: usize,
) -> Result<Corner, AssetError> {
    let mut parts = token.split('/');
    let position = resolve_index(parts.next().unwrap_or_default(), positions, path, line)?;
    let uv = match parts.next() {
        Some(raw) if !raw.is_empty() => Some(resolve_index(raw, uvs, path, line)?),
        _ => None,
    };
    let normal = match parts.next() {
        Some(raw) if !raw.is_empty() => Some(resolve_index(raw, normals, path, line)?),
        _ => None,
    };
    Ok(Corner {
        position,
        uv,
        normal,
    })
}

fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if length > f32::EPSILON {
        [n[0] / length, n[1] / length, n[2] / length]
    } else {
        [0.0, 1.0, 0.0]
    }
}

fn emit_triangle(
    group: &mut FaceGroup,
    corners: [Corner; 3],
    positions: &[[f32; 3]],
    normals: &[[f32; 3]],
    uvs: &[[f32; 2]],
) {
    let flat = face_normal(
        positions[corners[0].position],
        positions[corners[1].position],
        positions[corners[2].position],
    );
    for corner in corners {
        group.vertices.push(MeshVertex {
            position: positions[corner.position],
            normal: corner.normal.map_or(flat, |index| normals[index]),
            uv: corner.uv.map_or([0.0; 2], |index| uvs[index]),
        });
    }
}
