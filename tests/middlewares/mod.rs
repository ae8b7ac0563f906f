mod session_auth;
