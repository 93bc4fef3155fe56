//! PyO3 bindings for `shapely-extra`.
//!
//! Polygons cross the boundary as `(exterior, interiors)` tuples of `(x, y)`
//! rings and regions as lists of them; higher-level wrappers on the Python
//! side turn these into shapely objects.

mod common;
mod grids;
mod shapes;

use pyo3::prelude::*;

#[pymodule]
fn shapely_extra_native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", shapely_extra::VERSION)?;
    shapes::register(m)?;
    grids::register(m)?;
    Ok(())
}
