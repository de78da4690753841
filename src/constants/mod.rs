pub mod game;

/// Size of the framed play window, border included.
pub const WIDTH: u16 = 64;
pub const HEIGHT: u16 = 42;

pub const TITLE_TEXT: &str = r#"
 ___ _                       
| __| |__ _ _ __ _ __ _  _   
| _|| / _` | '_ \ '_ \ || |  
|_| |_\__,_| .__/ .__/\_, |  
           |_|  |_|   |__/   
"#;
