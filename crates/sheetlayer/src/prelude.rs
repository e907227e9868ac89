//! Prelude module - common imports for sheetlayer users
//!
//! ```rust
//! use sheetlayer::prelude::*;
//! ```

pub use crate::{
    convert,
    inspect,
    // Records
    Anchor,
    AnchorPoint,
    Diagnostic,
    DiagnosticKind,
    // Output
    EmitOptions,
    EmittedFiles,
    ExtractOptions,
    Geometry,
    ImageRecord,
    // Pipeline
    Pipeline,
    PipelineOptions,
    RunReport,
    ShapeRecord,
    SheetGeometry,
    SheetObjects,
    XlsxPackage,
};
