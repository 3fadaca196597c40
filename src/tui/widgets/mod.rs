pub mod analytics;
pub mod calendar;
pub mod color;
pub mod confirm_delete;
pub mod editor;
pub mod event_view;
pub mod filters_box;
pub mod form;
pub mod help;
pub mod note_list;
pub mod sections;
pub mod status_bar;
pub mod tabs;
pub mod timeline_list;
