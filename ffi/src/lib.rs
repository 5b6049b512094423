#![allow(clippy::missing_safety_doc)] // See include/su2import.h

use std::ffi::c_char;
use std::ffi::c_int;
use std::ffi::CString;
use std::fs;
use std::io;
use std::os::unix::io::FromRawFd as _;
use std::ptr;
use std::sync::OnceLock;
use su2_import::Mesh;

/// Reads an SU2 grid from `fd`, which is closed afterwards.
///
/// Returns null if the grid could not be imported.
#[no_mangle]
pub unsafe extern "C" fn sui_mesh_read(fd: c_int) -> *mut Mesh {
    let f = fs::File::from_raw_fd(fd);
    let r = io::BufReader::new(f);
    let m = match Mesh::from_reader(r) {
        Ok(m) => m,
        Err(_) => return ptr::null_mut(),
    };
    Box::into_raw(Box::new(m))
}

#[no_mangle]
pub unsafe extern "C" fn sui_mesh_free(mesh: *mut Mesh) {
    if !mesh.is_null() {
        drop(Box::from_raw(mesh));
    }
}

/// 2 or 3, or 0 if the grid has no elements region.
#[no_mangle]
pub unsafe extern "C" fn sui_mesh_dimension(mesh: *const Mesh) -> c_int {
    assert!(!mesh.is_null());
    match (*mesh).dimension() {
        Some(dimension) => dimension.ndime() as c_int,
        None => 0,
    }
}

#[no_mangle]
pub unsafe extern "C" fn sui_mesh_vertex_count(mesh: *const Mesh) -> u64 {
    assert!(!mesh.is_null());
    (*mesh).vertex_count() as u64
}

/// Writes the coordinates of vertex `vertex_idx` into `coordinates`, which
/// must hold three values. Returns -1 if there is no such vertex.
#[no_mangle]
pub unsafe extern "C" fn sui_mesh_vertex(
    mesh: *const Mesh,
    vertex_idx: usize,
    coordinates: *mut f64,
) -> c_int {
    assert!(!mesh.is_null());
    assert!(!coordinates.is_null());
    let Some(v) = (*mesh).vertices().get(vertex_idx) else {
        return -1;
    };
    let coordinates = std::slice::from_raw_parts_mut(coordinates, 3);
    coordinates.copy_from_slice(&[v.x, v.y, v.z]);
    0
}

#[no_mangle]
pub unsafe extern "C" fn sui_mesh_element_count(mesh: *const Mesh) -> u64 {
    assert!(!mesh.is_null());
    (*mesh).element_count() as u64
}

#[repr(C)]
pub struct Su2Element {
    /// SU2 element code, e.g. 5 for triangles.
    code: c_int,
    node_count: c_int,
    /// Owned by the mesh.
    nodes: *const usize,
}

/// Returns -1 and leaves `element` untouched if there is no such element.
#[no_mangle]
pub unsafe extern "C" fn sui_mesh_element(
    element: *mut Su2Element,
    mesh: *const Mesh,
    element_idx: usize,
) -> c_int {
    assert!(!mesh.is_null());
    assert!(!element.is_null());
    let Some(e) = (*mesh).elements().nth(element_idx) else {
        return -1;
    };
    *element = Su2Element {
        code: e.kind().code() as c_int,
        node_count: e.nodes().len() as c_int,
        nodes: e.nodes().as_ptr(),
    };
    0
}

/// The element kinds names, separated by `|`. The string is static.
#[no_mangle]
pub extern "C" fn sui_valid_elements() -> *const c_char {
    static VALID_ELEMENTS: OnceLock<CString> = OnceLock::new();
    VALID_ELEMENTS
        .get_or_init(|| {
            // Kind names are plain ASCII words.
            CString::new(su2_import::plugin::valid_elements()).unwrap_or_default()
        })
        .as_ptr()
}
