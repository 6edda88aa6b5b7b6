use std::path::PathBuf;
use tauri::Manager;

mod api;
mod auth;
mod cache;
mod db;
mod grades;
mod profile;
mod schedule;
mod tasks;
mod transfer;
mod umkd;

use api::PortalState;
use cache::QueryCache;
use transfer::store::MaterialStore;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let _ = env_logger::try_init();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_http::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_fs::init())
        .setup(|app| {
            // Initialize database in app data directory
            let app_data_dir = app
                .path()
                .app_data_dir()
                .expect("Failed to get app data dir");
            std::fs::create_dir_all(&app_data_dir).expect("Failed to create app data dir");

            let db_path: PathBuf = app_data_dir.join("studport.db");
            tauri::async_runtime::block_on(db::init_db(&db_path))
                .expect("Failed to initialize database");

            // Explicit application state: HTTP surface, response cache and
            // the platform persist strategy, composed once
            app.manage(PortalState::from_env());
            app.manage(QueryCache::new());
            app.manage(MaterialStore::for_platform());

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            auth::login,
            auth::get_session,
            auth::logout,
            schedule::commands::get_semester_schedule,
            schedule::commands::refresh_semester_schedule,
            schedule::commands::get_today_schedule,
            schedule::commands::load_cached_schedule,
            tasks::commands::list_tasks,
            tasks::commands::list_today_tomorrow_tasks,
            tasks::commands::create_task,
            tasks::commands::toggle_task_completion,
            tasks::commands::delete_task,
            tasks::attachments::list_task_attachments,
            tasks::attachments::upload_task_attachment,
            tasks::attachments::upload_task_attachments,
            tasks::attachments::download_task_attachment,
            tasks::attachments::delete_task_attachment,
            grades::commands::get_grades,
            grades::commands::refresh_grades,
            grades::commands::get_certification,
            grades::commands::refresh_certification,
            profile::get_profile,
            profile::list_students,
            profile::create_github_branch,
            umkd::commands::list_umkd_subjects,
            umkd::commands::list_teacher_files,
            transfer::commands::choose_materials_folder,
            transfer::commands::get_materials_folder,
            transfer::commands::download_material,
            transfer::commands::cancel_material_download,
            transfer::commands::get_saved_material,
            transfer::commands::list_saved_materials,
            transfer::opener::open_material,
            transfer::opener::share_material,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application")
}
