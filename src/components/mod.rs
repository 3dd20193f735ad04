pub(crate) mod sortable;
pub(crate) mod ui;
