pub mod home;
pub mod medico_form;
pub mod medicos;
