//! Input format readers

pub(crate) mod svd_xml;
