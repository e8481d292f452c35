//! OBJ keyframe import and frame export

use anyhow::{Context, Result, bail};
use glam::{Vec2, Vec3};
use hashbrown::HashMap;
use nether_md3::{ImportedMesh, MeshFrame, MeshMaterial, MeshSource, MeshTriangle};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Material used for faces that precede any `usemtl`
const DEFAULT_MATERIAL: &str = "default";

/// One triangle of a parsed OBJ, indexing its position list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjTriangle {
    pub vertices: [u32; 3],
    pub uvs: [Vec2; 3],
    pub material: usize,
}

/// A parsed OBJ file, triangulated, with one normal per position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjMesh {
    /// Name from the first `o` statement
    pub object: Option<String>,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub triangles: Vec<ObjTriangle>,
    /// Material names in order of first use
    pub materials: Vec<String>,
}

/// Parse an OBJ file
pub fn parse_obj_file(input: &Path) -> Result<ObjMesh> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    parse_obj(BufReader::new(file)).with_context(|| format!("Failed to parse OBJ: {:?}", input))
}

/// Parse OBJ text
///
/// Polygons are fan-triangulated. Normals given with `vn` are averaged per
/// position; positions without any get the average of their face normals.
pub fn parse_obj<R: BufRead>(reader: R) -> Result<ObjMesh> {
    let mut mesh = ObjMesh::default();
    let mut tex_coords: Vec<Vec2> = Vec::new();
    let mut normals_raw: Vec<Vec3> = Vec::new();
    let mut material_ids: HashMap<String, usize> = HashMap::new();
    let mut current_material: Option<usize> = None;

    // Per position: sum of referenced `vn` normals, sum of face normals
    let mut given_normals: Vec<Vec3> = Vec::new();
    let mut face_normals: Vec<Vec3> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" if parts.len() >= 4 => {
                mesh.positions.push(parse_vec3(&parts[1..4]));
            }
            "vt" if parts.len() >= 3 => {
                let u: f32 = parts[1].parse().unwrap_or(0.0);
                let v: f32 = parts[2].parse().unwrap_or(0.0);
                tex_coords.push(Vec2::new(u, v));
            }
            "vn" if parts.len() >= 4 => {
                normals_raw.push(parse_vec3(&parts[1..4]));
            }
            "o" if parts.len() >= 2 => {
                if mesh.object.is_none() {
                    mesh.object = Some(parts[1..].join(" "));
                }
            }
            "usemtl" if parts.len() >= 2 => {
                current_material = Some(material_id(&mut mesh, &mut material_ids, parts[1]));
            }
            "f" if parts.len() >= 4 => {
                let face_verts: Vec<(usize, Option<usize>, Option<usize>)> = parts[1..]
                    .iter()
                    .map(|v| parse_obj_vertex(v))
                    .collect::<Option<_>>()
                    .with_context(|| format!("line {}: bad face vertex", line_no + 1))?;

                for &(vi, _, vni) in &face_verts {
                    if vi >= mesh.positions.len() {
                        bail!(
                            "line {}: vertex {} out of range ({} defined)",
                            line_no + 1,
                            vi + 1,
                            mesh.positions.len()
                        );
                    }
                    if let Some(n) = vni.and_then(|ni| normals_raw.get(ni)) {
                        grow_to(&mut given_normals, vi + 1);
                        given_normals[vi] += *n;
                    }
                }

                let material = match current_material {
                    Some(id) => id,
                    None => {
                        let id = material_id(&mut mesh, &mut material_ids, DEFAULT_MATERIAL);
                        current_material = Some(id);
                        id
                    }
                };

                // Fan triangulation for convex polygons
                for i in 1..face_verts.len() - 1 {
                    let corners = [face_verts[0], face_verts[i], face_verts[i + 1]];
                    let vertices = corners.map(|(vi, _, _)| vi as u32);
                    let uvs = corners.map(|(_, vti, _)| {
                        vti.and_then(|ti| tex_coords.get(ti).copied())
                            .unwrap_or(Vec2::ZERO)
                    });

                    let [a, b, c] = corners.map(|(vi, _, _)| mesh.positions[vi]);
                    let normal = (b - a).cross(c - a);
                    for &(vi, _, _) in &corners {
                        grow_to(&mut face_normals, vi + 1);
                        face_normals[vi] += normal;
                    }

                    mesh.triangles.push(ObjTriangle {
                        vertices,
                        uvs,
                        material,
                    });
                }
            }
            _ => {}
        }
    }

    if mesh.positions.is_empty() {
        bail!("No vertices found in OBJ file");
    }

    grow_to(&mut given_normals, mesh.positions.len());
    grow_to(&mut face_normals, mesh.positions.len());
    mesh.normals = given_normals
        .iter()
        .zip(&face_normals)
        .map(|(given, face)| {
            given
                .try_normalize()
                .or_else(|| face.try_normalize())
                .unwrap_or(Vec3::Z)
        })
        .collect();

    Ok(mesh)
}

fn parse_vec3(parts: &[&str]) -> Vec3 {
    let x: f32 = parts[0].parse().unwrap_or(0.0);
    let y: f32 = parts[1].parse().unwrap_or(0.0);
    let z: f32 = parts[2].parse().unwrap_or(0.0);
    Vec3::new(x, y, z)
}

fn grow_to(v: &mut Vec<Vec3>, len: usize) {
    if v.len() < len {
        v.resize(len, Vec3::ZERO);
    }
}

fn material_id(mesh: &mut ObjMesh, ids: &mut HashMap<String, usize>, name: &str) -> usize {
    *ids.entry(name.to_string()).or_insert_with(|| {
        mesh.materials.push(name.to_string());
        mesh.materials.len() - 1
    })
}

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn"
fn parse_obj_vertex(s: &str) -> Option<(usize, Option<usize>, Option<usize>)> {
    let parts: Vec<&str> = s.split('/').collect();

    let vi = parts.first()?.parse::<usize>().ok()?.checked_sub(1)?; // OBJ indices are 1-based

    let vti = parts
        .get(1)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<usize>().ok())
        .and_then(|i| i.checked_sub(1));

    let vni = parts
        .get(2)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<usize>().ok())
        .and_then(|i| i.checked_sub(1));

    Some((vi, vti, vni))
}

/// Build a mesh source from OBJ keyframes sharing one topology
///
/// The first file supplies triangles, UVs, materials and normals; every file
/// supplies one frame of positions, named after its file stem.
pub fn load_keyframes(
    paths: &[PathBuf],
    name: Option<&str>,
    textures: &HashMap<String, String>,
) -> Result<MeshSource> {
    let Some(first_path) = paths.first() else {
        bail!("At least one OBJ keyframe is required");
    };
    let base = parse_obj_file(first_path)?;

    let mut frames = vec![MeshFrame {
        name: file_stem(first_path),
        positions: base.positions.clone(),
    }];
    for path in &paths[1..] {
        let keyframe = parse_obj_file(path)?;
        if keyframe.positions.len() != base.positions.len() {
            bail!(
                "Keyframe {:?} has {} vertices, expected {} (from {:?})",
                path,
                keyframe.positions.len(),
                base.positions.len(),
                first_path
            );
        }
        frames.push(MeshFrame {
            name: file_stem(path),
            positions: keyframe.positions,
        });
    }

    let name = name
        .map(str::to_string)
        .or_else(|| base.object.clone())
        .unwrap_or_else(|| file_stem(first_path));

    let materials = base
        .materials
        .iter()
        .map(|material| MeshMaterial {
            name: material.clone(),
            texture: textures.get(material).cloned(),
            params: Vec::new(),
        })
        .collect();

    let triangles = base
        .triangles
        .iter()
        .map(|t| MeshTriangle {
            vertices: t.vertices,
            material: t.material,
            uvs: t.uvs,
        })
        .collect();

    tracing::info!(
        "Loaded {} keyframe(s): {} vertices, {} triangles, {} material(s)",
        frames.len(),
        base.positions.len(),
        base.triangles.len(),
        base.materials.len()
    );

    Ok(MeshSource {
        name,
        materials,
        triangles,
        frames,
        normals: base.normals,
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Write one frame of a decoded mesh as OBJ text
pub fn write_obj<W: Write>(w: &mut W, mesh: &ImportedMesh, frame: usize) -> Result<()> {
    let Some(keyframe) = mesh.frames.get(frame) else {
        bail!(
            "Frame {} out of range (model has {} frames)",
            frame,
            mesh.frames.len()
        );
    };

    writeln!(w, "# {} frame {} ({})", mesh.name, frame, keyframe.name)?;
    writeln!(w, "o {}", mesh.name)?;
    for p in &keyframe.positions {
        writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for uv in mesh.corner_uvs.iter().flatten() {
        writeln!(w, "vt {} {}", uv.x, uv.y)?;
    }
    for n in &mesh.normals {
        writeln!(w, "vn {} {} {}", n.x, n.y, n.z)?;
    }

    for material in &mesh.materials {
        writeln!(w, "usemtl {}", material.name)?;
        for face in material.faces.clone() {
            let [a, b, c] = mesh.faces[face];
            let t = face * 3 + 1;
            writeln!(
                w,
                "f {}/{}/{} {}/{}/{} {}/{}/{}",
                a + 1,
                t,
                a + 1,
                b + 1,
                t + 1,
                b + 1,
                c + 1,
                t + 2,
                c + 1
            )?;
        }
    }

    Ok(())
}

/// Write one frame of a decoded mesh to an OBJ file
pub fn export_obj(mesh: &ImportedMesh, frame: usize, output: &Path) -> Result<()> {
    if frame >= mesh.frames.len() {
        bail!(
            "Frame {} out of range ({:?} has {} frames)",
            frame,
            mesh.name,
            mesh.frames.len()
        );
    }

    let file =
        File::create(output).with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);
    write_obj(&mut writer, mesh, frame)?;
    writer.flush()?;

    tracing::info!(
        "Exported frame {} of {}: {} vertices, {} faces",
        frame,
        mesh.name,
        mesh.positions.len(),
        mesh.faces.len()
    );
    Ok(())
}
