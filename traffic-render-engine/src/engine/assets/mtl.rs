use std::collections::HashMap;
use std::path::Path;

use super::error::AssetError;

/// One named `newmtl` block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialDescription {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
}

impl Default for MaterialDescription {
    fn default() -> Self {
        Self {
            ambient: [0.2; 3],
            diffuse: [0.8; 3],
            specular: [0.0; 3],
            shininess: 10.0,
        }
    }
}

/// Parse a Wavefront MTL library. Unknown statements are ignored.
pub fn parse_materials(
    text: &str,
    path: &Path,
) -> Result<HashMap<String, MaterialDescription>, AssetError> {
    let mut materials = HashMap::new();
    let mut current: Option<(String, MaterialDescription)> = None;

    for (number, raw) in text.lines().enumerate() {
        let line_no = number + 1;
        let line = raw.split('#').next().unwrap_or_default().trim();
        let mut fields = line.split_whitespace();
        let Some(keyword) = fields.next() else {
            continue;
        };

        if keyword == "newmtl" {
            if let Some((name, material)) = current.take() {
                materials.insert(name, material);
            }
            let name = fields
                .next()
                .ok_or_else(|| AssetError::malformed(path, line_no, "newmtl without a name"))?;
            current = Some((name.to_string(), MaterialDescription::default()));
            continue;
        }

        let Some((_, material)) = current.as_mut() else {
            continue;
        };
        match keyword {
            "Ka" => material.ambient = parse_colour(fields, path, line_no)?,
            "Kd" => material.diffuse = parse_colour(fields, path, line_no)?,
            "Ks" => material.specular = parse_colour(fields, path, line_no)?,
            "Ns" => {
                let token = fields
                    .next()
                    .ok_or_else(|| AssetError::malformed(path, line_no, "Ns without a value"))?;
                material.shininess = parse_value(token, path, line_no)?;
            }
            _ => {}
        }
    }

    if let Some((name, material)) = current {
        materials.insert(name, material);
    }
    Ok(materials)
}

fn parse_value(token: &str, path: &Path, line: usize) -> Result<f32, AssetError> {
    token
        .parse::<f32>()
        .map_err(|_| AssetError::malformed(path, line, format!("invalid number `{token}`")))
}

/// A single value is a grey level, as allowed by the format.
fn parse_colour<'a>(
    fields: impl Iterator<Item = &'a str>,
    path: &Path,
    line: usize,
) -> Result<[f32; 3], AssetError> {
    let values = fields
        .take(3)
        .map(|token| parse_value(token, path, line))
        .collect::<Result<Vec<_>, _>>()?;
    match values.as_slice() {
        [grey] => Ok([*grey; 3]),
        [r, g, b] => Ok([*r, *g, *b]),
        _ => Err(AssetError::malformed(path, line, "colour needs 1 or 3 values")),
    }
}
