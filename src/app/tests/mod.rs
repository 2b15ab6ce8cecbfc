mod terminal_surface;
