use eframe::egui::{self, Ui};

use crate::state::AppState;

/// Register / log-in forms.
pub fn account_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Login / Register");
    ui.label("Username needs at least 4 characters, password at least 6.");
    ui.add_space(8.0);

    egui::Grid::new("account_form")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Username");
            ui.text_edit_singleline(&mut state.account_form.username);
            ui.end_row();

            ui.label("Password");
            ui.add(egui::TextEdit::singleline(&mut state.account_form.password).password(true));
            ui.end_row();
        });

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Login").clicked() {
            state.login();
        }
        if ui.button("Register").clicked() {
            state.register();
        }
    });
}
