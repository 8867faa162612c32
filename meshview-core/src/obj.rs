/// Wavefront OBJ and MTL parsing
///
/// Both formats are line oriented: the first token of a line selects the
/// record kind and the rest is parsed with nom. Blank lines, `#` comments and
/// unknown keywords are ignored. A malformed line is skipped with a warning so
/// one bad record does not cost the whole model.
use nalgebra::{Point2, Point3};
use nom::{
    bytes::complete::take_till1,
    character::complete::{char, i64 as integer, space0, space1},
    combinator::{all_consuming, opt, rest, verify},
    multi::many1,
    number::complete::float,
    sequence::{preceded, terminated},
    IResult,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MeshError, Result};
use crate::geometry::{Face, Material, Mesh, TexCoord, Vertex};
use crate::texture::TextureLoader;

/// Raw contents of an OBJ file before normalization
#[derive(Debug, Default)]
pub struct ObjData {
    pub vertices: Vec<Vertex>,
    pub tex_coords: Vec<TexCoord>,
    pub faces: Vec<Face>,
    pub materials: HashMap<String, Material>,
}

impl ObjData {
    pub fn into_mesh(self, name: impl Into<String>) -> Mesh {
        Mesh::from_parts(name, self.vertices, self.tex_coords, self.faces, self.materials)
    }
}

/// One `f` element: `v`, `v/t`, `v//n` or `v/t/n`, still 1-based
#[derive(Debug, Clone, Copy, PartialEq)]
struct FaceElement {
    vertex: i64,
    tex_coord: Option<i64>,
}

#[derive(Debug, PartialEq)]
enum ObjRecord<'a> {
    Vertex(Vec<f32>),
    TexCoord(Vec<f32>),
    Face(Vec<FaceElement>),
    MaterialLibrary(&'a str),
    UseMaterial(&'a str),
    Ignored,
}

#[derive(Debug, PartialEq)]
enum MtlRecord<'a> {
    NewMaterial(&'a str),
    DiffuseMap(&'a str),
    Ignored,
}

fn keyword(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

fn numbers(input: &str) -> IResult<&str, Vec<f32>> {
    all_consuming(terminated(many1(preceded(space1, float)), space0))(input)
}

fn argument(input: &str) -> IResult<&str, &str> {
    let non_blank = verify(rest, |s: &str| !s.trim().is_empty());
    let (input, value) = all_consuming(preceded(space1, non_blank))(input)?;
    Ok((input, value.trim()))
}

fn face_element(input: &str) -> IResult<&str, FaceElement> {
    let (input, vertex) = integer(input)?;
    let (input, tex_coord) = opt(preceded(char('/'), opt(integer)))(input)?;
    let (input, _normal) = opt(preceded(char('/'), opt(integer)))(input)?;
    Ok((
        input,
        FaceElement {
            vertex,
            tex_coord: tex_coord.flatten(),
        },
    ))
}

fn face_elements(input: &str) -> IResult<&str, Vec<FaceElement>> {
    all_consuming(terminated(many1(preceded(space1, face_element)), space0))(input)
}

fn significant(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        None
    } else {
        Some(line)
    }
}

fn parse_obj_record(line: &str) -> std::result::Result<ObjRecord<'_>, String> {
    let Some(line) = significant(line) else {
        return Ok(ObjRecord::Ignored);
    };
    let (body, kind) = keyword(line).map_err(|e| e.to_string())?;
    let record = match kind {
        "v" => {
            let (_, values) = numbers(body).map_err(|e| e.to_string())?;
            if values.len() < 3 {
                return Err(format!("vertex needs 3 coordinates, got {}", values.len()));
            }
            ObjRecord::Vertex(values)
        }
        "vt" => ObjRecord::TexCoord(numbers(body).map_err(|e| e.to_string())?.1),
        "f" => ObjRecord::Face(face_elements(body).map_err(|e| e.to_string())?.1),
        "mtllib" => ObjRecord::MaterialLibrary(argument(body).map_err(|e| e.to_string())?.1),
        "usemtl" => ObjRecord::UseMaterial(argument(body).map_err(|e| e.to_string())?.1),
        _ => ObjRecord::Ignored,
    };
    Ok(record)
}

fn parse_mtl_record(line: &str) -> std::result::Result<MtlRecord<'_>, String> {
    let Some(line) = significant(line) else {
        return Ok(MtlRecord::Ignored);
    };
    let (body, kind) = keyword(line).map_err(|e| e.to_string())?;
    let record = match kind {
        "newmtl" => MtlRecord::NewMaterial(argument(body).map_err(|e| e.to_string())?.1),
        "map_Kd" => MtlRecord::DiffuseMap(argument(body).map_err(|e| e.to_string())?.1),
        _ => MtlRecord::Ignored,
    };
    Ok(record)
}

/// Convert a 1-based (or negative, relative) OBJ index to 0-based.
///
/// Positive indices are not checked against `count`; that happens at render
/// time.
fn resolve_index(raw: i64, count: usize) -> Option<usize> {
    match raw {
        0 => None,
        i if i > 0 => usize::try_from(i - 1).ok(),
        i => count.checked_sub(usize::try_from(i.unsigned_abs()).ok()?),
    }
}

fn base_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new(""))
}

fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| MeshError::from_io(path, e))?;
    String::from_utf8(bytes).map_err(|e| MeshError::ParseFailure {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse OBJ text. `path` names the file for diagnostics and anchors relative
/// `mtllib` references.
pub fn parse_obj(source: &str, path: &Path, textures: &dyn TextureLoader) -> ObjData {
    let mut data = ObjData::default();
    let mut active_material: Option<String> = None;

    for (number, line) in source.lines().enumerate() {
        let record = match parse_obj_record(line) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("{}:{}: skipping malformed line: {}", path.display(), number + 1, e);
                continue;
            }
        };

        match record {
            ObjRecord::Vertex(values) => {
                data.vertices.push(Point3::new(values[0], values[1], values[2]));
            }
            ObjRecord::TexCoord(values) => {
                let v = values.get(1).copied().unwrap_or(0.0);
                data.tex_coords.push(Point2::new(values[0], v));
            }
            ObjRecord::Face(elements) => {
                match build_face(&elements, data.vertices.len(), data.tex_coords.len()) {
                    Some(mut face) => {
                        face.material = active_material.clone();
                        data.faces.push(face);
                    }
                    None => {
                        log::warn!(
                            "{}:{}: skipping face with invalid index",
                            path.display(),
                            number + 1
                        );
                    }
                }
            }
            ObjRecord::MaterialLibrary(library) => {
                let library_path = base_dir(path).join(library);
                match load_mtl(&library_path, textures) {
                    Ok(materials) => data.materials.extend(materials),
                    Err(e) => log::warn!("Error loading material library: {}", e),
                }
            }
            ObjRecord::UseMaterial(name) => active_material = Some(name.to_string()),
            ObjRecord::Ignored => {}
        }
    }

    data
}

fn build_face(elements: &[FaceElement], vertex_count: usize, tex_count: usize) -> Option<Face> {
    let mut face = Face::default();
    for element in elements {
        face.vertices.push(resolve_index(element.vertex, vertex_count)?);
        let tex = match element.tex_coord {
            Some(raw) => Some(resolve_index(raw, tex_count)?),
            None => None,
        };
        face.tex_coords.push(tex);
    }
    Some(face)
}

/// Read, parse and normalize an OBJ file into a mesh named after the file.
///
/// A file that cannot be read, is not UTF-8 or yields no vertices is an
/// error; the caller decides on the fallback.
pub fn load_obj(path: &Path, textures: &dyn TextureLoader) -> Result<Mesh> {
    let source = read_source(path)?;
    let data = parse_obj(&source, path, textures);
    if data.vertices.is_empty() {
        return Err(MeshError::ParseFailure {
            path: path.to_path_buf(),
            message: "no vertices".to_string(),
        });
    }

    log::info!(
        "Loaded OBJ file '{}': {} vertices, {} tex coords, {} faces",
        path.display(),
        data.vertices.len(),
        data.tex_coords.len(),
        data.faces.len()
    );

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(data.into_mesh(name))
}

/// Parse MTL text. Textures are resolved relative to `path`'s directory; a
/// texture that fails to load leaves its material untextured.
pub fn parse_mtl(
    source: &str,
    path: &Path,
    textures: &dyn TextureLoader,
) -> HashMap<String, Material> {
    let mut materials = HashMap::new();
    let mut current: Option<String> = None;

    for (number, line) in source.lines().enumerate() {
        let record = match parse_mtl_record(line) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("{}:{}: skipping malformed line: {}", path.display(), number + 1, e);
                continue;
            }
        };

        match record {
            MtlRecord::NewMaterial(name) => {
                materials.insert(name.to_string(), Material::new(name));
                current = Some(name.to_string());
            }
            MtlRecord::DiffuseMap(texture) => {
                let material = current.as_ref().and_then(|name| materials.get_mut(name));
                let Some(material) = material else {
                    log::warn!("{}:{}: map_Kd outside of a material", path.display(), number + 1);
                    continue;
                };
                let texture_path: PathBuf = base_dir(path).join(texture);
                match textures.load_texture(&texture_path) {
                    Ok(texture) => material.texture = Some(texture),
                    Err(e) => log::warn!("Error loading texture: {}", e),
                }
            }
            MtlRecord::Ignored => {}
        }
    }

    materials
}

pub fn load_mtl(path: &Path, textures: &dyn TextureLoader) -> Result<HashMap<String, Material>> {
    let source = read_source(path)?;
    Ok(parse_mtl(&source, path, textures))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::Texture;
    use std::fs;

    fn no_textures(path: &Path) -> Result<Texture> {
        Err(MeshError::TextureLoadFailure {
            path: path.to_path_buf(),
            message: "disabled".into(),
        })
    }

    fn solid_texture(_path: &Path) -> Result<Texture> {
        Ok(Texture::new(1, 1, vec![Color::GREEN]))
    }

    fn parse(source: &str) -> ObjData {
        parse_obj(source, Path::new("inline.obj"), &no_textures)
    }

    #[test]
    fn test_single_triangle() {
        let data = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        assert_eq!(data.vertices.len(), 3);
        assert_eq!(data.faces.len(), 1);
        assert_eq!(data.faces[0].vertices, vec![0, 1, 2]);
        assert_eq!(data.faces[0].tex_coords, vec![None; 3]);

        let mesh = data.into_mesh("triangle");
        assert_eq!(mesh.edges, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_face_element_forms() {
        let data = parse(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nvt 0 0\nvt 1 0\nvt 0.5 1\n\
             f 1/1 2/2 3/3\nf 1//1 2//1 3//1\nf 2/1/1 4/2/1 3//1\n",
        );
        assert_eq!(data.tex_coords.len(), 3);
        assert_eq!(data.faces[0].tex_coords, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(data.faces[1].tex_coords, vec![None; 3]);
        assert_eq!(data.faces[2].vertices, vec![1, 3, 2]);
        assert_eq!(data.faces[2].tex_coords, vec![Some(0), Some(1), None]);
    }

    #[test]
    fn test_negative_indices_are_relative() {
        let data = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n");
        assert_eq!(data.faces[0].vertices, vec![0, 1, 2]);
    }

    #[test]
    fn test_comments_blank_and_unknown_lines_ignored() {
        let data = parse("# a comment\n\n   \no object\ns off\nvn 0 0 1\nv 1 2 3\r\n");
        assert_eq!(data.vertices, vec![Point3::new(1.0, 2.0, 3.0)]);
        assert!(data.faces.is_empty());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let data = parse(
            "v 1 2\nv 1 two 3\nv 0 0 0\nv 1 0 0 1.0\nv 0 1 0\nf 1 2 x\nf 0 1 2\nf 1 2 3\n",
        );
        assert_eq!(data.vertices.len(), 3);
        assert_eq!(data.faces.len(), 1);
    }

    #[test]
    fn test_out_of_range_indices_kept() {
        let data = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n");
        assert_eq!(data.faces[0].vertices, vec![0, 1, 8]);
    }

    #[test]
    fn test_usemtl_applies_to_following_faces() {
        let data = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nusemtl red paint\nf 1 2 3\n");
        assert_eq!(data.faces[0].material, None);
        assert_eq!(data.faces[1].material.as_deref(), Some("red paint"));
    }

    #[test]
    fn test_short_vt_defaults_v() {
        let data = parse("vt 0.25\n");
        assert_eq!(data.tex_coords, vec![Point2::new(0.25, 0.0)]);
    }

    #[test]
    fn test_mtl_records() {
        let materials = parse_mtl(
            "# materials\nnewmtl plain\nKd 1 0 0\nnewmtl wood\nmap_Kd textures/wood.png\n",
            Path::new("assets/scene.mtl"),
            &|path: &Path| {
                assert_eq!(path, Path::new("assets/textures/wood.png"));
                solid_texture(path)
            },
        );
        assert_eq!(materials.len(), 2);
        assert!(materials["plain"].texture.is_none());
        assert!(materials["wood"].texture.is_some());
    }

    #[test]
    fn test_texture_failure_keeps_material() {
        let materials = parse_mtl(
            "newmtl wood\nmap_Kd wood.png\n",
            Path::new("scene.mtl"),
            &no_textures,
        );
        assert!(materials["wood"].texture.is_none());
    }

    #[test]
    fn test_map_kd_without_material_ignored() {
        let materials = parse_mtl("map_Kd wood.png\n", Path::new("scene.mtl"), &solid_texture);
        assert!(materials.is_empty());
    }

    #[test]
    fn test_load_obj_with_material_library() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("box.mtl"), "newmtl skin\nmap_Kd skin.png\n").unwrap();
        fs::write(
            dir.path().join("box.obj"),
            "mtllib box.mtl\nv 0 0 0\nv 4 0 0\nv 0 4 0\n\
             vt 0 0\nvt 1 0\nvt 0 1\nusemtl skin\nf 1/1 2/2 3/3\n",
        )
        .unwrap();

        let mesh = load_obj(&dir.path().join("box.obj"), &|path: &Path| {
            assert_eq!(path, dir.path().join("skin.png"));
            solid_texture(path)
        })
        .unwrap();

        assert_eq!(mesh.name, "box.obj");
        assert_eq!(mesh.vertices.len(), 3);
        assert!(mesh.texture_for(&mesh.faces[0]).is_some());
        assert_eq!(mesh.face_uvs(&mesh.faces[0])[1], Point2::new(1.0, 0.0));
    }

    #[test]
    fn test_missing_material_library_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lonely.obj");
        fs::write(&path, "mtllib nowhere.mtl\nv 0 0 0\nv 1 1 1\n").unwrap();
        let mesh = load_obj(&path, &no_textures).unwrap();
        assert!(mesh.materials.is_empty());
        assert_eq!(mesh.vertices.len(), 2);
    }

    #[test]
    fn test_load_failures() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_obj(&dir.path().join("missing.obj"), &no_textures),
            Err(MeshError::FileNotFound(_))
        ));

        let empty = dir.path().join("empty.obj");
        fs::write(&empty, "# nothing here\n").unwrap();
        assert!(matches!(load_obj(&empty, &no_textures), Err(MeshError::ParseFailure { .. })));

        let binary = dir.path().join("binary.obj");
        fs::write(&binary, [0xff, 0xfe, 0x00, 0x80]).unwrap();
        assert!(matches!(load_obj(&binary, &no_textures), Err(MeshError::ParseFailure { .. })));
    }
}
