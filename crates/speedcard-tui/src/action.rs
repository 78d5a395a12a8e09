/// Everything the event loop can ask the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Resize(u16, u16),

    // Global
    Quit,
    ForceQuit,
    NavigateBack,
    ToggleHelp,

    // Paging
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    StartJump,

    // Current entry
    ToggleFlag,
    /// Enter: edit note in normal mode, confirm in a dialog.
    DrillIn,
    StartEditNote,

    // Dialogs
    Confirm,

    // Panels and export
    ToggleSummary,
    Export,
    CycleExportFormat,
    Reset,
    ToggleLargePager,
    CycleTheme,
    SavePreferences,

    // Text input (note editor and page jump)
    TextInput(char),
    TextBackspace,
    TextConfirm,
    TextCancel,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    DeleteForward,

    // Mouse
    ClickAt(u16, u16),
}
